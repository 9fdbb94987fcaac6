use crate::app::App;
use crate::config::Config;
use crate::logger::setup_logger;
use crate::responses::error_response;
use crate::router::handle;
use astra::Server;
use log::{error, info, warn};

mod app;
mod auth;
mod backend;
mod config;
mod db;
mod domain;
mod errors;
mod logger;
mod requests;
mod responses;
mod router;
mod services;
mod templates;
mod time;

#[cfg(test)]
mod tests;

fn main() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = setup_logger(config.log_level) {
        eprintln!("Logger setup failed: {e}");
    }

    let addr = config.bind_addr;
    let workers = config.max_workers;

    let app = match App::from_config(config) {
        Ok(app) => app,
        Err(e) => {
            error!("startup failed: {e}");
            std::process::exit(1);
        }
    };

    info!("listening on http://{addr} with {workers} workers");
    let server = Server::bind(&addr).max_workers(workers);

    let result = server.serve(move |req: astra::Request, _info| {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();

        let resp = match handle(req, &app) {
            Ok(resp) => resp,
            Err(err) => error_response(err),
        };

        let status = resp.status();
        if status.is_server_error() {
            warn!("{method} {path} -> {}", status.as_u16());
        } else {
            info!("{method} {path} -> {}", status.as_u16());
        }
        resp
    });

    if let Err(e) = result {
        error!("server ended with error: {e}");
    }

    info!("server shut down");
}
