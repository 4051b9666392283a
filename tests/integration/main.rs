//! End-to-end tests driving the HTTP router, the queue and the worker.

mod health_test;
mod helpers;
mod mail_test;
