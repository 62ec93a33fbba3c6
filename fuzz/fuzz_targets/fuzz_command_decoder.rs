//! Fuzz target: `RemoteCommand::decode`
//!
//! Drives arbitrary byte sequences into the commands-channel decoder and
//! asserts that it never panics and that every accepted payload names a
//! canonical downtime reason.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use pressmon::app::commands::{MAX_COMMAND_LEN, RemoteCommand};
use pressmon::error::CommandError;
use pressmon::events::DowntimeReason;

fuzz_target!(|data: &[u8]| {
    match RemoteCommand::decode(data) {
        Ok(RemoteCommand::SelectReason(reason)) => {
            assert!(data.len() <= MAX_COMMAND_LEN);
            // The canonical label must map back to itself.
            assert_eq!(DowntimeReason::from_label(reason.label()), Some(reason));
        }
        Err(CommandError::TooLarge(len)) => {
            assert_eq!(len, data.len());
            assert!(len > MAX_COMMAND_LEN);
        }
        Err(_) => assert!(data.len() <= MAX_COMMAND_LEN),
    }
});
