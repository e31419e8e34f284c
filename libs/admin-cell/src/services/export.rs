use chrono::NaiveDate;

use booking_cell::models::Reservation;

/// Renders the reservation book as a standalone HTML document suitable for a
/// `.doc` download, the way the front-desk export produces it.
pub fn render_export(reservations: &[Reservation], date: Option<NaiveDate>) -> String {
    let title = match date {
        Some(date) => format!("Reservations for {}", date),
        None => "All reservations".to_string(),
    };

    let mut rows = String::new();
    for r in reservations {
        let created = r
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&r.patient_name),
            escape(&r.phone),
            escape(&r.practitioner_id),
            escape(&r.service_id),
            r.date,
            escape(&r.time),
            r.status,
            created,
        ));
    }

    format!(
        "<html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>table {{ border-collapse: collapse; width: 100%; }} \
         th, td {{ border: 1px solid #d1d5db; padding: 8px; font-size: 12px; }}</style>\
         </head><body><h1>{title}</h1><table><thead><tr>\
         <th>Patient</th><th>Phone</th><th>Practitioner</th><th>Service</th>\
         <th>Date</th><th>Time</th><th>Status</th><th>Created</th>\
         </tr></thead><tbody>\n{rows}</tbody></table></body></html>"
    )
}

/// Suggested download name for the export.
pub fn export_filename(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("reservations_{}.doc", date),
        None => "reservations_all.doc".to_string(),
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
