//! Wire codecs used by the probes.

pub mod dns;
