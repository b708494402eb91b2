use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::dispatcher::NotificationDispatcher;
use crate::routes::{Endpoint, RequestContext};
use crate::routing::{QueryParams, RoutePatternError, RouteTable};

/// Url-encoded bodies above this size are not parsed.
const FORM_LIMIT: usize = 100 * 1024;

pub fn build_route_table() -> Result<RouteTable<Endpoint>, RoutePatternError> {
    RouteTable::new()
        .get("/", Endpoint::Index)?
        .get("/env", Endpoint::Env)?
        .get("/hello", Endpoint::Hello)?
        .get("/check-helper-1/:param", Endpoint::CheckHelper)?
        .get("/check-helper-2/:param", Endpoint::CheckHelper)?
        .get("/query", Endpoint::Query)?
        .get("/splat/:splat(*)", Endpoint::Splat)?
        .get("/error", Endpoint::Error)?
        .get("/error/code/:code", Endpoint::ErrorCode)?
        .get("/error/custom-handler", Endpoint::ErrorCustomHandler)?
        .get("/mailgun", Endpoint::MailForm)?
        .post("/mailgun", Endpoint::MailSubmit)
}

pub fn run(
    listener: TcpListener,
    dispatcher: NotificationDispatcher,
) -> Result<Server, anyhow::Error> {
    let route_table = web::Data::new(build_route_table()?);
    let dispatcher = web::Data::new(dispatcher);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::FormConfig::default().limit(FORM_LIMIT))
            .app_data(route_table.clone())
            .app_data(dispatcher.clone())
            .default_service(web::to(handle_request))
    })
        .listen(listener)?
        .run();
    Ok(server)
}

/// Every request goes through the route table; a miss is a bare 404.
async fn handle_request(
    request: HttpRequest,
    payload: web::Payload,
    route_table: web::Data<RouteTable<Endpoint>>,
    dispatcher: web::Data<NotificationDispatcher>,
) -> HttpResponse {
    let route = match route_table.find(request.method(), request.path()) {
        Some(route) => route,
        None => return HttpResponse::NotFound().finish(),
    };
    tracing::debug!(pattern = route.pattern.as_str(), "Route matched");

    let endpoint = *route.handler;
    let ctx = RequestContext {
        query: QueryParams::parse(request.query_string()),
        params: route.params,
        request,
        payload: payload.into_inner(),
    };

    match endpoint.call(ctx, &dispatcher).await {
        Ok(response) => response,
        Err(e) => endpoint.error_chain().respond(&e),
    }
}
