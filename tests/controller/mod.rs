mod admin;
mod auth;
mod billing;
mod feed;
mod health;
mod i18n;
mod listing;
