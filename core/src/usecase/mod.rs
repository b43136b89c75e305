pub mod history;
pub mod session;

#[cfg(test)]
mod history_test;
#[cfg(test)]
mod session_test;
