use crate::service::{QueryOutcome, QueryService, VendorQuery};
use actix_cors::Cors;
use actix_web::{error, web, App, HttpResponse, HttpServer, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

pub struct RestApi;

impl RestApi {
    pub async fn start(service: Arc<QueryService>, host: &str, port: u16) -> std::io::Result<()> {
        info!("Serving {} vendors on {}:{}", service.catalog().len(), host, port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(service.clone()))
                .configure(Self::configure)
        })
        .bind((host, port))?
        .run()
        .await
    }

    /// Register the routes. Expects `web::Data<Arc<QueryService>>` as app data.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.app_data(Self::json_config())
            .route("/vendor_qualification", web::post().to(vendor_qualification))
            .route("/categories", web::get().to(list_categories))
            .route("/health", web::get().to(health));
    }

    /// Unreadable request bodies get a 422 with the same `detail` shape as
    /// the other error responses
    fn json_config() -> web::JsonConfig {
        web::JsonConfig::default().error_handler(|err, _req| {
            let detail = err.to_string();
            let response = HttpResponse::UnprocessableEntity().json(serde_json::json!({ "detail": detail }));
            error::InternalError::from_response(err, response).into()
        })
    }
}

async fn vendor_qualification(
    service: web::Data<Arc<QueryService>>,
    req: web::Json<VendorQuery>,
) -> ActixResult<HttpResponse> {
    let query = req.into_inner();
    let category = query.software_category.clone();

    match service.query_with_timeout(query).await {
        Ok(QueryOutcome::Ranked(matches)) => Ok(HttpResponse::Ok().json(matches)),
        Ok(QueryOutcome::NoCategoryMatch {
            category,
            known_categories,
        }) => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "detail": format!(
                "No vendors found in category '{}'. Available categories: {:?}",
                category, known_categories
            ),
            "available_categories": known_categories,
        }))),
        Ok(QueryOutcome::NoCapabilityMatch) => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "detail": "No vendors matched the capabilities."
        }))),
        Err(e) => {
            error!("vendor_qualification failed for category {:?}: {:?}", category, e);
            let detail = if service.config().expose_internal_errors {
                format!("Internal error: {}", e)
            } else {
                "Internal error".to_string()
            };
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "detail": detail
            })))
        }
    }
}

async fn list_categories(service: web::Data<Arc<QueryService>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": service.catalog().categories()
    })))
}

async fn health(service: web::Data<Arc<QueryService>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "vendors": service.catalog().len(),
        "embedder": service.embedder_name(),
    })))
}
