mod arbitrary;

mod encode_good;
mod property_roundtrip;
