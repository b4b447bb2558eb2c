//! HTTP router tests driving the full application through `tower::ServiceExt::oneshot`.

mod controller;
mod util;
