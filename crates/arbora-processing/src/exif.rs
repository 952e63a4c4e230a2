//! GPS coordinate extraction from embedded EXIF metadata.
//!
//! Extraction is best-effort by contract: a photo without usable GPS fields
//! is an expected outcome (the UI prompts for manual entry), so every parse
//! failure degrades to `None` instead of surfacing an error.

use std::io::Cursor;

use exif::{Exif, In, Rational, Reader, Tag, Value};

use arbora_core::models::GeoPoint;

/// Extract the embedded GPS position from image bytes, if any.
///
/// Coordinates are converted from the EXIF degrees/minutes/seconds rationals
/// with hemisphere references into signed decimal degrees (negative for
/// south/west). Returns `None` for a missing or malformed EXIF segment,
/// absent GPS fields, zero-denominator rationals, or out-of-range values —
/// never partially populated.
pub fn extract_location(data: &[u8]) -> Option<GeoPoint> {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        Err(e) => {
            tracing::debug!(error = %e, "No readable EXIF segment");
            return None;
        }
    };

    let latitude = signed_coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S')?;
    let longitude = signed_coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W')?;

    let point = GeoPoint::new(latitude, longitude);
    if point.is_none() {
        tracing::debug!(latitude, longitude, "GPS coordinates out of range");
    }
    point
}

/// Read one coordinate and apply its hemisphere reference.
///
/// `negative_ref` is the reference letter that flips the sign (`S` or `W`).
fn signed_coordinate(exif: &Exif, value_tag: Tag, ref_tag: Tag, negative_ref: u8) -> Option<f64> {
    let magnitude = match &exif.get_field(value_tag, In::PRIMARY)?.value {
        Value::Rational(dms) => dms_to_decimal(dms)?,
        _ => return None,
    };

    let hemisphere = match &exif.get_field(ref_tag, In::PRIMARY)?.value {
        Value::Ascii(parts) => *parts.first()?.first()?,
        _ => return None,
    };

    if hemisphere.eq_ignore_ascii_case(&negative_ref) {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}

/// Convert a degrees/minutes/seconds rational triple to decimal degrees.
///
/// Degrees are required; some encoders omit minutes or seconds, which count
/// as zero. A zero denominator anywhere poisons the value.
fn dms_to_decimal(dms: &[Rational]) -> Option<f64> {
    let degrees = finite(dms.first()?)?;
    let minutes = match dms.get(1) {
        Some(r) => finite(r)?,
        None => 0.0,
    };
    let seconds = match dms.get(2) {
        Some(r) => finite(r)?,
        None => 0.0,
    };
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}

fn finite(r: &Rational) -> Option<f64> {
    if r.denom == 0 {
        None
    } else {
        Some(r.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exif::experimental::Writer;
    use exif::Field;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn rational(num: u32, denom: u32) -> Rational {
        Rational { num, denom }
    }

    /// Build a raw EXIF (TIFF) buffer carrying the given GPS fields.
    fn gps_exif(lat: [(u32, u32); 3], lat_ref: &[u8], lon: [(u32, u32); 3], lon_ref: &[u8]) -> Vec<u8> {
        let lat_field = Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(lat.iter().map(|&(n, d)| rational(n, d)).collect()),
        };
        let lat_ref_field = Field {
            tag: Tag::GPSLatitudeRef,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![lat_ref.to_vec()]),
        };
        let lon_field = Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(lon.iter().map(|&(n, d)| rational(n, d)).collect()),
        };
        let lon_ref_field = Field {
            tag: Tag::GPSLongitudeRef,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![lon_ref.to_vec()]),
        };

        let mut writer = Writer::new();
        writer.push_field(&lat_field);
        writer.push_field(&lat_ref_field);
        writer.push_field(&lon_field);
        writer.push_field(&lon_ref_field);

        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_extracts_northern_eastern_coordinates() {
        let data = gps_exif([(51, 1), (30, 1), (0, 1)], b"N", [(0, 1), (7, 1), (30, 1)], b"E");
        let point = extract_location(&data).unwrap();
        assert!((point.latitude - 51.5).abs() < 1e-9);
        assert!((point.longitude - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_southern_western_references_are_negative() {
        let data = gps_exif([(1, 1), (17, 1), (0, 1)], b"S", [(36, 1), (49, 1), (0, 1)], b"W");
        let point = extract_location(&data).unwrap();
        assert!(point.latitude < 0.0);
        assert!(point.longitude < 0.0);
        assert!((point.latitude + (1.0 + 17.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_denominator_degrades_to_none() {
        let data = gps_exif([(51, 0), (30, 1), (0, 1)], b"N", [(0, 1), (7, 1), (30, 1)], b"E");
        assert!(extract_location(&data).is_none());
    }

    #[test]
    fn test_out_of_range_coordinates_degrade_to_none() {
        let data = gps_exif([(123, 1), (0, 1), (0, 1)], b"N", [(0, 1), (0, 1), (0, 1)], b"E");
        assert!(extract_location(&data).is_none());
    }

    #[test]
    fn test_missing_gps_fields_degrade_to_none() {
        // Valid EXIF buffer with no GPS fields at all.
        let field = Field {
            tag: Tag::Orientation,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![1]),
        };
        let mut writer = Writer::new();
        writer.push_field(&field);
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();

        assert!(extract_location(&buf.into_inner()).is_none());
    }

    #[test]
    fn test_image_without_exif_degrades_to_none() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 128, 0, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();

        assert!(extract_location(&buf.into_inner()).is_none());
    }

    #[test]
    fn test_garbage_bytes_degrade_to_none() {
        assert!(extract_location(b"definitely not an image").is_none());
        assert!(extract_location(&[]).is_none());
    }

    #[test]
    fn test_dms_with_fractional_seconds() {
        let dms = [rational(12, 1), rational(34, 1), rational(5678, 100)];
        let decimal = dms_to_decimal(&dms).unwrap();
        assert!((decimal - (12.0 + 34.0 / 60.0 + 56.78 / 3600.0)).abs() < 1e-9);
    }
}
