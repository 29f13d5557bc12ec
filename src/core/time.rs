use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// Human date printed in document headers, e.g. `16 Oct 2026`.
pub(crate) fn format_document_date(value: PrimitiveDateTime) -> String {
    let format = format_description!("[day] [month repr:short] [year]");
    value.date().format(&format).unwrap_or_else(|_| value.date().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Time};

    fn sample() -> PrimitiveDateTime {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        PrimitiveDateTime::new(date, time)
    }

    #[test]
    fn format_primitive_outputs_utc_z() {
        assert_eq!(format_primitive(sample()), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn format_document_date_is_short_and_readable() {
        assert_eq!(format_document_date(sample()), "02 Jan 2025");
    }
}
