//! Development server with on-request hydration.
//!
//! A lightweight HTTP server built on `tiny_http`:
//!
//! - `.html` requests are hydrated on the fly, fetching the content
//!   documents fresh on every request - the same
//!   fetch-fresh-per-page-load lifecycle the hydrated site originally had
//! - other files are served statically from the templates directory
//! - automatic `index.html` resolution for directories
//! - graceful shutdown on Ctrl+C
//!
//! A hydration data error never produces an error response: the page is
//! served with its static fallback content and the failure goes to the
//! diagnostic log.

use crate::{
    config::SellaConfig,
    fetch::DataSource,
    hydrate::hydrate_page,
    log,
    markdown,
};
use anyhow::{Context, Result};
use std::{
    fs,
    io::Cursor,
    net::SocketAddr,
    path::Path,
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Start the development server.
///
/// This function:
/// 1. Binds to the configured interface and port (with auto-retry on port conflict)
/// 2. Sets up Ctrl+C handler for graceful shutdown
/// 3. Enters the main request handling loop
///
/// The server blocks until Ctrl+C is received.
pub fn serve_site(config: &'static SellaConfig) -> Result<()> {
    let interface: std::net::IpAddr = config.serve.interface.parse()?;
    let base_port = config.serve.port;

    let (server, addr) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    let source = DataSource::from_config(config)?;
    let md = markdown::converter(config.data.markdown);

    // Handle requests in main thread (blocks until Ctrl+C)
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config, &source, md.as_ref()) {
            log!("serve"; "request error: {e:#}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < max_retries => {
                // Will retry silently
                continue;
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    max_retries,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

/// Handle a single HTTP request.
///
/// Request resolution order:
/// 1. `.html` file -> hydrate and serve
/// 2. other file -> serve statically
/// 3. directory with index.html -> hydrate and serve index.html
/// 4. Nothing found -> 404
fn handle_request(
    request: Request,
    config: &SellaConfig,
    source: &DataSource,
    md: &dyn markdown::MarkdownConverter,
) -> Result<()> {
    let serve_root = &config.build.templates;

    // Decode URL-encoded characters (e.g., %20 -> space)
    let url_path = urlencoding::decode(request.url())
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    // Strip query string (e.g., ?t=123456) before resolving path
    let path_without_query = url_path.split('?').next().unwrap_or(&url_path);
    let request_path = path_without_query.trim_matches('/');
    let local_path = serve_root.join(request_path);

    if local_path.is_file() {
        if local_path.extension().is_some_and(|ext| ext == "html") {
            return serve_hydrated(request, &local_path, source, md);
        }
        return serve_file(request, &local_path);
    }

    if local_path.is_dir() {
        let index_path = local_path.join("index.html");
        if index_path.is_file() {
            return serve_hydrated(request, &index_path, source, md);
        }
    }

    serve_not_found(request)
}

/// Hydrate a template and serve the result.
///
/// Documents are fetched fresh for this request; data failures degrade to
/// the template's static content rather than an error response.
fn serve_hydrated(
    request: Request,
    path: &Path,
    source: &DataSource,
    md: &dyn markdown::MarkdownConverter,
) -> Result<()> {
    let content =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let hydrated = hydrate_page(&content, source, md)
        .with_context(|| format!("Failed to hydrate {}", path.display()))?;

    let response = Response::from_data(hydrated).with_header(
        Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap(),
    );
    request.respond(response)?;
    Ok(())
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = guess_content_type(path);

    let response = Response::from_data(content)
        .with_header(Header::from_bytes("Content-Type", content_type).unwrap());

    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![Header::from_bytes("Content-Type", "text/plain").unwrap()],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",

        // Default binary
        _ => "application/octet-stream",
    }
}
