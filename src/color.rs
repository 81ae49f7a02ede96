//! Color specifications from the configuration.

/// A parsed color: either exact 16-bit RGB or a name for the server's
/// color database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    Rgb(u16, u16, u16),
    Named(String),
}

impl ColorSpec {
    /// Parse `#rrggbb`, `rgb:r/g/b` (1 to 4 hex digits per channel) or a
    /// color name.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() == 6 {
                let channel = |i: usize| {
                    hex.get(i..i + 2)
                        .and_then(|c| u16::from_str_radix(c, 16).ok())
                };
                if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
                    return Self::Rgb(r * 0x101, g * 0x101, b * 0x101);
                }
            }
        }
        if let Some(spec) = s.strip_prefix("rgb:") {
            let channels: Vec<Option<u16>> = spec.split('/').map(scale_channel).collect();
            if let [Some(r), Some(g), Some(b)] = channels.as_slice() {
                return Self::Rgb(*r, *g, *b);
            }
        }
        Self::Named(s.to_string())
    }
}

/// Scale an `h`, `hh`, `hhh` or `hhhh` channel to 16 bits.
fn scale_channel(hex: &str) -> Option<u16> {
    if hex.is_empty() || hex.len() > 4 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    let max = (1u32 << (4 * hex.len())) - 1;
    u16::try_from(value * 0xffff / max).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hex() {
        assert_eq!(ColorSpec::parse("#ff0080"), ColorSpec::Rgb(0xffff, 0, 0x8080));
        assert_eq!(ColorSpec::parse("#ff00"), ColorSpec::Named("#ff00".into()));
    }

    #[test]
    fn test_rgb_prefix() {
        assert_eq!(
            ColorSpec::parse("rgb:88/88/88"),
            ColorSpec::Rgb(0x8888, 0x8888, 0x8888)
        );
        assert_eq!(ColorSpec::parse("rgb:f/0/fff"), ColorSpec::Rgb(0xffff, 0, 0xffff));
        assert_eq!(
            ColorSpec::parse("rgb:00/80"),
            ColorSpec::Named("rgb:00/80".into())
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(ColorSpec::parse(" red "), ColorSpec::Named("red".into()));
    }
}
