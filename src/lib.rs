pub mod app;
pub mod config;
pub mod error;
pub mod tags;
pub mod models {
    pub mod page;
    pub mod slug;
}
pub mod storage {
    pub mod pages;
}
pub mod api {
    pub mod envelope;
    pub mod errors;
    pub mod health;
    pub mod pages;
    pub mod tags;
}
