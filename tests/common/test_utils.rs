//! Test utilities and helper functions

use i2c_regmap::RegisterTable;

use crate::common::mock_transport::MockTransport;

/// Device address used throughout the tests (LIDAR-Lite v3 default)
pub const DEV_ADDR: u8 = 0x62;

/// Convert a 0/1 pattern into a bit vector, index 0 = least significant
pub fn bits(pattern: &[u8]) -> Vec<bool> {
    pattern.iter().map(|&b| b != 0).collect()
}

/// Create an empty table over a mock transport
///
/// Returns (table, transport handle) where the handle shares state with the
/// transport owned by the table.
pub fn create_table() -> (RegisterTable<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let handle = transport.clone();
    (RegisterTable::new(DEV_ADDR, transport), handle)
}
