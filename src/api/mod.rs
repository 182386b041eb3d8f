pub mod handlers;
pub mod middleware;
pub mod router;

#[cfg(test)]
pub mod test_support;
