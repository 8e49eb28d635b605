use crate::models::{ListingType, Property};
use std::fmt;

pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder-property.jpg";

/// What a result card shows
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyCard {
    pub id: String,
    pub title: String,
    pub price: String,
    pub specs: String,
    pub location: String,
    pub image: String,
}

impl From<&Property> for PropertyCard {
    fn from(p: &Property) -> Self {
        let mut price = format!("€{}", group_thousands(p.price.round() as i64));
        if p.listing_type == ListingType::Rent {
            price.push_str("/month");
        }

        let location = if p.state.is_empty() || p.state == p.city {
            p.city.clone()
        } else {
            format!("{}, {}", p.city, p.state)
        };

        Self {
            id: p.id.clone(),
            title: p.title.clone(),
            price,
            specs: format!(
                "{} bd · {} ba · {} m²",
                p.bedrooms,
                p.bathrooms,
                p.area.round() as i64
            ),
            location,
            image: p
                .primary_image()
                .unwrap_or(PLACEHOLDER_IMAGE)
                .to_string(),
        }
    }
}

impl fmt::Display for PropertyCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.price)?;
        writeln!(f, "   {}", self.specs)?;
        write!(f, "   {}", self.location)
    }
}

pub fn summarize(visible: usize, total: usize) -> String {
    match (visible, total) {
        (_, 0) => "No properties match your filters".to_string(),
        (v, t) if v == t => format!("Showing {} properties", t),
        (v, t) => format!("Showing {} of {} properties", v, t),
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}
