use crate::services::qr_service::QrService;

pub struct AppState {
    pub qrs: QrService,
    /// Origin plus base path, used to build resolve URLs
    pub public_prefix: String,
}

impl AppState {
    pub fn resolve_url(&self, id: &str) -> String {
        format!("{}/api/qrs/{}/resolve", self.public_prefix, id)
    }
}
