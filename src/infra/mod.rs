pub mod http_client;
pub mod map_widget;
pub mod marker_binder;
