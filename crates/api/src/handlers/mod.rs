pub mod artwork_admin;
pub mod artwork_review;
