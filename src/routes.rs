use crate::{
    api::{attendance, dashboard, employee, subscription},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let register_limiter = build_limiter(config.rate_register_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes. Registered before the protected scope so they win the
    // shared /api prefix.
    cfg.service(
        web::resource(format!("{}/register", config.api_prefix))
            .wrap(register_limiter)
            .route(web::post().to(handlers::register)),
    );
    cfg.service(
        web::resource(format!("{}/login", config.api_prefix))
            .wrap(login_limiter)
            .route(web::post().to(handlers::login)),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(web::resource("/checkin").route(web::post().to(attendance::check_in)))
            .service(web::resource("/checkout").route(web::post().to(attendance::check_out)))
            .service(
                web::resource("/attendance/today")
                    .route(web::get().to(attendance::today_status)),
            )
            .service(
                web::scope("/dashboard")
                    .service(web::resource("").route(web::get().to(dashboard::dashboard)))
                    .service(
                        web::resource("/employee-summary")
                            .route(web::get().to(dashboard::employee_summary)),
                    )
                    .service(
                        web::resource("/employee-details/{id}")
                            .route(web::get().to(dashboard::employee_details)),
                    ),
            )
            .service(
                web::scope("/employee")
                    .service(web::resource("/profile").route(web::get().to(employee::profile)))
                    .service(
                        web::resource("/report").route(web::get().to(employee::employee_report)),
                    ),
            )
            .service(web::resource("/subscribe").route(web::post().to(subscription::subscribe)))
            .service(
                web::resource("/unsubscribe").route(web::post().to(subscription::unsubscribe)),
            ),
    );
}
