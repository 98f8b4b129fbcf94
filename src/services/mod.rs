pub mod qr_service;
pub mod resolver;
