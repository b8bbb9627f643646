pub mod advance;
pub mod create;
pub mod fund;
pub mod init;
pub mod keys;
pub mod pay;
pub mod query;
pub mod submit;
