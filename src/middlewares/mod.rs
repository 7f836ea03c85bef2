pub mod cors_middleware;
