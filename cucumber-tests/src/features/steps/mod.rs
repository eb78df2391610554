pub mod auth_steps;
pub mod guard_steps;
pub mod menu_steps;
