// One module per resource; each handler makes at most one service call.
pub mod auth;
pub mod demandes;
pub mod dev;
pub mod documents;
pub mod notifications;
pub mod pages;
pub mod stagiaires;
pub mod system;
pub mod templates;
pub mod users;
