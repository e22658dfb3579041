pub mod bitmap;
pub mod byte_util;
pub mod extension_codec;
pub mod field_codec;
pub mod message_codec;
pub mod mti;
pub mod ppn_codec;
pub mod response_status;
