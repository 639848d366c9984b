//! End-to-end tests over a realistic device map
//!
//! The map mirrors a small rangefinder at I2C address 0x62: a write-only
//! command register, a status register with flag bits, and multi-byte
//! measurement registers.

use i2c_regmap::{Access, RegisterTable};

use crate::common::mock_transport::MockTransport;
use crate::common::{create_table, Operation};

fn rangefinder_table() -> (RegisterTable<MockTransport>, MockTransport) {
    let (mut table, transport) = create_table();

    table
        .add_register("ACQ_COMMAND", 0x00, Access::WriteOnly)
        .unwrap()
        .add_segment("COMMAND", 0, 7, &[false; 8])
        .unwrap();
    table
        .add_register("STATUS", 0x01, Access::ReadOnly)
        .unwrap()
        .add_segment("BUSY_FLAG", 0, 0, &[false])
        .unwrap()
        .add_segment("HEALTH_FLAG", 5, 5, &[false])
        .unwrap();
    table
        .add_register("VELOCITY", 0x09, Access::ReadOnly)
        .unwrap()
        .add_segment("VELOCITY", 0, 7, &[false; 8])
        .unwrap();
    table
        .add_register("FULL_DELAY", 0x0F, Access::ReadOnly)
        .unwrap()
        .add_segment("DISTANCE", 0, 15, &[false; 16])
        .unwrap();

    (table, transport)
}

#[test]
fn busy_flag_reads_back_as_one() {
    let (mut table, transport) = rangefinder_table();
    transport.set_register(0x01, 0x01);

    assert_eq!(table.to_int("STATUS", "BUSY_FLAG", true).unwrap(), 1);
    assert_eq!(
        transport.operations(),
        vec![Operation::ReadBytes {
            dev_addr: 0x62,
            reg_addr: 0x01,
            len: 1,
        }]
    );
}

#[test]
fn acquisition_command_writes_the_expected_byte() {
    let (mut table, transport) = rangefinder_table();

    table
        .set_bits_from_int("ACQ_COMMAND", "COMMAND", 0x04, true)
        .unwrap();

    assert_eq!(
        transport.operations(),
        vec![Operation::WriteBytes {
            dev_addr: 0x62,
            reg_addr: 0x00,
            bytes: vec![0x04],
        }]
    );
}

#[test]
fn status_flags_decode_independently() {
    let (mut table, transport) = rangefinder_table();

    // Busy (bit 0) and health (bit 5) both set.
    transport.set_register(0x01, 0x21);
    table.read("STATUS").unwrap();

    assert_eq!(table.to_int("STATUS", "BUSY_FLAG", false).unwrap(), 1);
    assert_eq!(table.to_int("STATUS", "HEALTH_FLAG", false).unwrap(), 1);

    transport.set_register(0x01, 0x20);
    table.read("STATUS").unwrap();

    assert_eq!(table.to_int("STATUS", "BUSY_FLAG", false).unwrap(), 0);
    assert_eq!(table.to_int("STATUS", "HEALTH_FLAG", false).unwrap(), 1);
}

#[test]
fn distance_spans_two_bytes() {
    let (mut table, transport) = rangefinder_table();

    transport.set_register(0x0F, 0x34);
    transport.set_register(0x10, 0x12);

    assert_eq!(table.to_int("FULL_DELAY", "DISTANCE", true).unwrap(), 0x1234);
}

#[test]
fn velocity_is_twos_complement() {
    let (mut table, transport) = rangefinder_table();

    transport.set_register(0x09, 0xF6);
    assert_eq!(
        table.to_twos_complement_int("VELOCITY", "VELOCITY", true).unwrap(),
        -10
    );

    transport.set_register(0x09, 0x0A);
    assert_eq!(
        table.to_twos_complement_int("VELOCITY", "VELOCITY", true).unwrap(),
        10
    );
}

#[test]
fn measurement_workflow() {
    let (mut table, transport) = rangefinder_table();

    // Trigger a measurement.
    table
        .set_bits_from_int("ACQ_COMMAND", "COMMAND", 0x04, true)
        .unwrap();
    assert_eq!(transport.get_register(0x00), 0x04);

    // Device reports busy, then idle.
    transport.set_register(0x01, 0x01);
    assert_eq!(table.to_int("STATUS", "BUSY_FLAG", true).unwrap(), 1);

    transport.set_register(0x01, 0x00);
    assert_eq!(table.to_int("STATUS", "BUSY_FLAG", true).unwrap(), 0);

    // Result becomes available.
    transport.set_register(0x0F, 0x90);
    transport.set_register(0x10, 0x01);
    assert_eq!(table.to_int("FULL_DELAY", "DISTANCE", true).unwrap(), 0x0190);
}
