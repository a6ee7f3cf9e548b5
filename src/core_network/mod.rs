pub mod network;

#[cfg(test)]
mod test_network;
