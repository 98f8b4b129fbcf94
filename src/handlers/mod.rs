pub mod health_handlers;
pub mod qr_handlers;
pub mod render_handlers;
pub mod resolve_handlers;
