pub mod vl53l0x;
