use crate::config::AppConfig;
use crate::services::booking::BookingTool;

pub struct AppState {
    pub config: AppConfig,
    pub booking: BookingTool,
}
