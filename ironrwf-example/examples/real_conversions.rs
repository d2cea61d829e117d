//! Real value conversions example.
//!
//! Parses prices in decimal and fractional notation, shows their wire form,
//! and converts them to `f64` and `Decimal`.

mod common;

use bytes::BytesMut;
use common::{hex, init_logging};
use ironrwf_codec::primitive::{decode_real, encode_real};
use ironrwf_core::{Real, RealHint};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    for text in ["12.50", "-0.0375", "3/8", "12 1/4", "555.000", "Inf", "NaN", ""] {
        let real: Real = text.parse()?;
        let mut wire = BytesMut::new();
        encode_real(&mut wire, &real);
        let back = decode_real(&wire)?;
        info!(
            "{:>10?} -> hint {:?} mantissa {} wire [{}] f64 {} decimal {:?} display {:?}",
            text,
            real.hint(),
            real.mantissa(),
            hex(&wire),
            back.to_f64(),
            back.to_decimal(),
            back.to_string()
        );
    }

    let price = Real::from_f64(101.125, RealHint::Fraction8)?;
    info!("101.125 as eighths: {} ({})", price.mantissa(), price);

    Ok(())
}
