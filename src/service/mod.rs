pub mod notification_composer;
pub mod quote_service;
pub mod row_normalizer;
