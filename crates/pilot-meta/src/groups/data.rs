//! Dataloader options.

use crate::{GroupScope, OptionDescriptor, OptionGroup, Validator};
use std::thread;

/// Parallel reads default to the number of available cores.
fn default_parallel_reads() -> i64 {
    thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(1)
}

pub fn group() -> OptionGroup {
    OptionGroup::new("data", GroupScope::Data)
        .with(
            OptionDescriptor::new("dataloader_type", "Type of the dataloader")
                .with_default("tfrecord")
                .with_validator(Validator::choice(["tfrecord", "custom"])),
        )
        .with(
            OptionDescriptor::new("tfrecord_training_files", "TFRecord training files")
                .with_null_default()
                .path(),
        )
        .with(
            OptionDescriptor::new("tfrecord_validation_files", "TFRecord validation files")
                .with_null_default()
                .path(),
        )
        .with(
            OptionDescriptor::new("tfrecord_test_files", "TFRecord test files")
                .with_null_default()
                .path(),
        )
        .with(
            OptionDescriptor::new("tfrecord_buffer_size", "Read buffer size in bytes")
                .with_null_default()
                .with_validator(Validator::int_min(1)),
        )
        .with(
            OptionDescriptor::new("tfrecord_num_parallel_reads", "Number of files read in parallel")
                .with_default(default_parallel_reads())
                .with_validator(Validator::int_min(1)),
        )
        .with(
            OptionDescriptor::new("tfrecord_compression_type", "Compression of the record files")
                .with_default("GZIP")
                .with_validator(Validator::choice(["GZIP", "ZLIB", ""])),
        )
        .with(
            OptionDescriptor::new("tfrecord_compression_level", "Compression level")
                .with_default(9)
                .with_validator(Validator::int_range(1, 9)),
        )
}
