// Application layer - Use cases over the repository trait
pub mod chart_service;
pub mod dashboard_service;
pub mod ticket_repository;
