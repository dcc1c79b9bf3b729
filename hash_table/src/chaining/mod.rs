pub mod linked;

#[cfg(test)]
mod metrics;
