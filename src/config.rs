/// Server configuration - immutable after load
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub lobby_capacity: usize,
    pub lobby_id_length: usize,
    pub lobby_id_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3001,
            lobby_capacity: 5,
            lobby_id_length: 6,
            lobby_id_attempts: 32,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.http_port, 3001);
        assert_eq!(config.lobby_capacity, 5);
        assert_eq!(config.lobby_id_length, 6);
    }

    #[test]
    fn test_id_retry_budget_is_bounded() {
        let config = Config::default();
        assert!(config.lobby_id_attempts > 0);
    }
}
