//! Lunar day estimate and Gregorian to Hijri conversion
//!
//! Both are approximations good enough for planner content. Neither is a
//! substitute for an observed-moon Islamic calendar.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::{LUNAR_EPOCH, SYNODIC_MONTH_DAYS};
use crate::cycle::days_between;
use crate::models::Language;

const HIJRI_MONTHS_EN: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

const HIJRI_MONTHS_AR: [&str; 12] = [
    "محرم",
    "صفر",
    "ربيع الأول",
    "ربيع الآخر",
    "جمادى الأولى",
    "جمادى الآخرة",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذو القعدة",
    "ذو الحجة",
];

/// Day of the lunar month in `1..=30`, counted in synodic months from a
/// reference new moon.
pub fn lunar_day(date: NaiveDate) -> u32 {
    let (year, month, day) = LUNAR_EPOCH;
    let Some(epoch) = NaiveDate::from_ymd_opt(year, month, day) else {
        return 1;
    };
    let cycles = days_between(epoch, date) as f64 / SYNODIC_MONTH_DAYS;
    let fraction = cycles - cycles.floor();
    ((fraction * 30.0).floor() as u32 + 1).min(30)
}

/// Waxing half of the lunar month.
pub fn is_waxing(lunar_day: u32) -> bool {
    lunar_day <= 15
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HijriDate {
    pub day: u32,
    /// 1 = Muharram
    pub month: u32,
    pub year: i64,
}

impl HijriDate {
    pub fn month_name(&self, language: Language) -> &'static str {
        let index = (self.month.clamp(1, 12) - 1) as usize;
        match language {
            Language::En => HIJRI_MONTHS_EN[index],
            Language::Ar => HIJRI_MONTHS_AR[index],
        }
    }

    pub fn formatted(&self, language: Language) -> String {
        match language {
            Language::En => format!("{} {} {} AH", self.day, self.month_name(language), self.year),
            Language::Ar => format!("{} {} {} هـ", self.day, self.month_name(language), self.year),
        }
    }
}

/// Julian day number of a Gregorian date at noon.
fn julian_day(date: NaiveDate) -> f64 {
    let mut year = f64::from(date.year());
    let mut month = f64::from(date.month());
    let day = f64::from(date.day());
    if month < 3.0 {
        year -= 1.0;
        month += 12.0;
    }

    let a = (year / 100.0).floor();
    let mut b = 2.0 - a + (a / 4.0).floor();
    if year < 1583.0 {
        b = 0.0;
    }
    if year == 1582.0 {
        if month > 10.0 {
            b = -10.0;
        }
        if month == 10.0 {
            b = if day > 4.0 { -10.0 } else { 0.0 };
        }
    }

    (365.25 * (year + 4716.0)).floor() + (30.6001 * (month + 1.0)).floor() + day + b - 1524.0
}

/// Kuwaiti algorithm: arithmetic Islamic calendar on a 30-year cycle.
pub fn hijri_date(date: NaiveDate) -> HijriDate {
    const CYCLE_DAYS: f64 = 10631.0;
    const EPOCH_ASTRO: f64 = 1948084.0;
    let year_length = CYCLE_DAYS / 30.0;
    let shift = 8.01 / 60.0;

    let mut z = julian_day(date) - EPOCH_ASTRO;
    let cycle = (z / CYCLE_DAYS).floor();
    z -= CYCLE_DAYS * cycle;
    let j = ((z - shift) / year_length).floor();
    let year = 30.0 * cycle + j;
    z -= (j * year_length + shift).floor();
    let mut month = ((z + 28.5001) / 29.5).floor();
    if month == 13.0 {
        month = 12.0;
    }
    let day = z - (29.5001 * month - 29.0).floor();

    HijriDate {
        day: day as u32,
        month: month as u32,
        year: year as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn epoch_is_day_one() {
        assert_eq!(lunar_day(date("2000-01-06")), 1);
        assert_eq!(lunar_day(date("2000-01-21")), 16);
    }

    #[test]
    fn lunar_day_stays_in_range() {
        let mut d = date("1995-01-01");
        for _ in 0..4000 {
            let day = lunar_day(d);
            assert!((1..=30).contains(&day), "{d} -> {day}");
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn julian_day_matches_reference() {
        assert_eq!(julian_day(date("2024-01-01")), 2460311.0);
        assert_eq!(julian_day(date("2024-03-11")), 2460381.0);
        assert_eq!(julian_day(date("2000-01-01")), 2451545.0);
    }

    #[test]
    fn kuwaiti_conversion() {
        assert_eq!(
            hijri_date(date("2024-03-11")),
            HijriDate { day: 2, month: 9, year: 1445 }
        );
        assert_eq!(
            hijri_date(date("2024-01-01")),
            HijriDate { day: 20, month: 6, year: 1445 }
        );
    }

    #[test]
    fn localized_month_names() {
        let ramadan = HijriDate { day: 2, month: 9, year: 1445 };
        assert_eq!(ramadan.formatted(Language::En), "2 Ramadan 1445 AH");
        assert_eq!(ramadan.month_name(Language::Ar), "رمضان");
    }
}
