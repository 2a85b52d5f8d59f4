// Here's the list of the FTP commands implemented
pub mod clnt;
pub mod cwd;
pub mod dele;
pub mod list;
pub mod mkd;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// Dispatch table and parsing
pub mod ftpcommand;
pub mod handlers;

// The utils and common functions are here
pub mod utils;
