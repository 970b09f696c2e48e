pub mod dashboard_service;
pub mod delete_service;
pub mod delivery_service;
pub mod material_service;
pub mod package_service;
pub mod received_item_service;
pub mod refresh_service;
pub mod registry_service;
pub mod report_service;
pub mod session_service;
pub mod staff_service;
pub mod time_record_service;
pub mod visitor_service;
