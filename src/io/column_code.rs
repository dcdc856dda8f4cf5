/// Sex prefix of a population column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
}

/// A population column header such as `f_98_42`: sex, then the `98` table
/// marker, then a single-year age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCode {
    pub sex: Sex,
    pub age: u32,
}

const TABLE_MARKER: &str = "_98_";

impl ColumnCode {
    /// Parse a header. Only the leading part has to match; anything after
    /// the age digits is ignored (`m_98_7_total` is age 7).
    pub fn parse(name: &str) -> Option<ColumnCode> {
        let sex = match name.as_bytes().first()? {
            b'f' => Sex::Female,
            b'm' => Sex::Male,
            _ => return None,
        };
        let rest = name[1..].strip_prefix(TABLE_MARKER)?;
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        // oversized ages saturate and are rejected later by the bucketing
        let age = rest[..digits]
            .bytes()
            .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add((d - b'0') as u32));
        Some(ColumnCode { sex, age })
    }
}
