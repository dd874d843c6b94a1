pub mod account;
pub mod candidate;
pub mod email;
pub mod password;
pub mod policy;
pub mod username;
