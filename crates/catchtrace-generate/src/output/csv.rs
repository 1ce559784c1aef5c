//! Per-kind CSV rendering with byte accounting.
//!
//! Each event kind has its own column set; the common header columns come
//! first, the body columns after. List-valued fields are joined with `;`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use catchtrace_core::{Event, EventBody, EventKind, LineageKey, ParticipantId};

use crate::path::Batch;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const COMMON_COLUMNS: &[&str] = &[
    "event_id",
    "event_type",
    "previous_keys",
    "new_key",
    "branch",
    "event_time",
    "location_name",
    "location_coordinate",
    "generator_id",
    "last_participants",
    "next_participant",
    "company_name",
];

/// Write one batch to a CSV file, returning the bytes written.
pub fn write_batch_csv(path: &Path, batch: &Batch) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    let mut header: Vec<&str> = COMMON_COLUMNS.to_vec();
    header.extend_from_slice(body_columns(batch.kind));
    writer.write_record(&header)?;

    for event in &batch.events {
        let mut record = common_fields(event);
        record.extend(body_fields(&event.body));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

fn body_columns(kind: EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::Catch => &[
            "vessel_id",
            "product_id",
            "serial_number",
            "weight",
            "catch_date",
            "species",
            "economic_zone",
            "first_freeze_date",
            "catch_certificate_id",
            "conservation_reference_size",
            "catch_area",
            "owner_name",
        ],
        EventKind::Sale => &[
            "auction_id",
            "supplier_id",
            "customer_id",
            "product_id",
            "serial_number",
            "weight",
            "product_name",
        ],
        EventKind::Transport => &[
            "supplier_id",
            "customer_id",
            "carrier_id",
            "pallet_id",
            "product_id",
            "serial_number",
            "weight",
            "destination_id",
            "departure_id",
            "temperature",
        ],
        EventKind::Processing => &[
            "factory_id",
            "input_product_ids",
            "output_product_ids",
            "serial_number",
            "quantity",
            "brand_name",
            "product_method",
            "ingredient_statement",
            "storage_state",
            "expiration_date",
        ],
        EventKind::Packing => &[
            "packer_id",
            "input_product_ids",
            "output_product_ids",
            "serial_number",
            "quantity",
            "net_content",
            "packing_type_code",
            "packing_material",
            "recycling_process",
        ],
        EventKind::Shipment => &[
            "supplier_id",
            "customer_id",
            "carrier_id",
            "pallet_id",
            "product_ids",
            "serial_number",
            "quantity",
            "destination_id",
            "departure_id",
            "weight",
            "temperature",
        ],
        EventKind::Retail => &[
            "retailer_id",
            "product_ids",
            "serial_number",
            "quantity",
            "price",
        ],
    }
}

fn common_fields(event: &Event) -> Vec<String> {
    vec![
        event.event_id.clone(),
        event.kind().code().to_string(),
        join_keys(&event.previous_keys),
        event.new_key.to_string(),
        event.branch.to_string(),
        event.event_time.format(TIME_FORMAT).to_string(),
        event.location_name.clone(),
        event.location_coordinate.clone(),
        event.generator_id.to_string(),
        join_ids(&event.last_participants),
        event
            .next_participant
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        event.company_name.clone(),
    ]
}

fn body_fields(body: &EventBody) -> Vec<String> {
    match body {
        EventBody::Catch {
            vessel_id,
            product_id,
            serial_number,
            weight,
            catch_date,
            species,
            economic_zone,
            first_freeze_date,
            catch_certificate_id,
            conservation_reference_size,
            catch_area,
            owner_name,
        } => vec![
            vessel_id.to_string(),
            product_id.clone(),
            serial_number.clone(),
            weight.to_string(),
            catch_date.to_string(),
            species.clone(),
            economic_zone.clone(),
            first_freeze_date.to_string(),
            catch_certificate_id.clone(),
            conservation_reference_size.clone(),
            catch_area.clone(),
            owner_name.clone(),
        ],
        EventBody::Sale {
            auction_id,
            supplier_id,
            customer_id,
            product_id,
            serial_number,
            weight,
            product_name,
        } => vec![
            auction_id.to_string(),
            supplier_id.to_string(),
            customer_id.to_string(),
            product_id.clone(),
            serial_number.clone(),
            weight.to_string(),
            product_name.clone(),
        ],
        EventBody::Transport {
            supplier_id,
            customer_id,
            carrier_id,
            pallet_id,
            product_id,
            serial_number,
            weight,
            destination_id,
            departure_id,
            temperature,
        } => vec![
            supplier_id.to_string(),
            customer_id.to_string(),
            carrier_id.to_string(),
            pallet_id.clone(),
            product_id.clone(),
            serial_number.clone(),
            weight.to_string(),
            destination_id.clone(),
            departure_id.clone(),
            temperature.to_string(),
        ],
        EventBody::Processing {
            factory_id,
            input_product_ids,
            output_product_ids,
            serial_number,
            quantity,
            brand_name,
            product_method,
            ingredient_statement,
            storage_state,
            expiration_date,
        } => vec![
            factory_id.to_string(),
            input_product_ids.join(";"),
            output_product_ids.join(";"),
            serial_number.clone(),
            quantity.to_string(),
            brand_name.clone(),
            product_method.clone(),
            ingredient_statement.clone(),
            storage_state.clone(),
            expiration_date.to_string(),
        ],
        EventBody::Packing {
            packer_id,
            input_product_ids,
            output_product_ids,
            serial_number,
            quantity,
            net_content,
            packing_type_code,
            packing_material,
            recycling_process,
        } => vec![
            packer_id.to_string(),
            input_product_ids.join(";"),
            output_product_ids.join(";"),
            serial_number.clone(),
            quantity.to_string(),
            net_content.to_string(),
            packing_type_code.clone(),
            packing_material.clone(),
            recycling_process.clone(),
        ],
        EventBody::Shipment {
            supplier_id,
            customer_id,
            carrier_id,
            pallet_id,
            product_ids,
            serial_number,
            quantity,
            destination_id,
            departure_id,
            weight,
            temperature,
        } => vec![
            supplier_id.to_string(),
            customer_id.to_string(),
            carrier_id.to_string(),
            pallet_id.clone(),
            product_ids.join(";"),
            serial_number.clone(),
            quantity.to_string(),
            destination_id.clone(),
            departure_id.clone(),
            weight.to_string(),
            temperature.to_string(),
        ],
        EventBody::Retail {
            retailer_id,
            product_ids,
            serial_number,
            quantity,
            price,
        } => vec![
            retailer_id.to_string(),
            product_ids.join(";"),
            serial_number.clone(),
            quantity.to_string(),
            price.to_string(),
        ],
    }
}

fn join_keys(keys: &[LineageKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

fn join_ids(ids: &[ParticipantId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catchtrace_core::{BranchId, ParticipantId};
    use chrono::NaiveDate;

    fn sample_event() -> Event {
        Event {
            event_id: "ev-1".to_string(),
            previous_keys: vec![LineageKey::new("k1"), LineageKey::new("k2")],
            new_key: LineageKey::new("k3"),
            branch: BranchId(1),
            event_time: NaiveDate::from_ymd_opt(2024, 1, 4)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            location_name: "Surabaya".to_string(),
            location_coordinate: "-7.250445,112.768845".to_string(),
            generator_id: ParticipantId::new("1111111111111"),
            last_participants: vec![
                ParticipantId::new("2222222222222"),
                ParticipantId::new("3333333333333"),
            ],
            next_participant: None,
            company_name: "Surabaya_processing_0".to_string(),
            body: EventBody::Processing {
                factory_id: ParticipantId::new("1111111111111"),
                input_product_ids: vec!["p1".to_string(), "p2".to_string()],
                output_product_ids: vec!["p3".to_string()],
                serial_number: "42ABC".to_string(),
                quantity: 200,
                brand_name: "brand".to_string(),
                product_method: "abc".to_string(),
                ingredient_statement: "saltwatersaltfishsal".to_string(),
                storage_state: "PREVIOUSLY_FROZEN".to_string(),
                expiration_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            },
        }
    }

    #[test]
    fn round_trip_preserves_rows_and_fields() {
        let dir = std::env::temp_dir().join(format!("catchtrace-csv-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("processing.csv");

        let batch = Batch {
            kind: EventKind::Processing,
            events: vec![sample_event(), sample_event()],
        };
        let bytes = write_batch_csv(&path, &batch).unwrap();
        assert!(bytes > 0);
        assert_eq!(bytes, std::fs::metadata(&path).unwrap().len());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .unwrap();
        let header = reader.headers().unwrap().clone();
        assert_eq!(&header[0], "event_id");
        assert_eq!(&header[12], "factory_id");
        assert_eq!(&header[18], "product_method");

        let rows: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "k1;k2");
        assert_eq!(&rows[0][5], "2024-01-04 12:00:00");
        assert_eq!(&rows[0][13], "p1;p2");

        std::fs::remove_dir_all(&dir).ok();
    }
}
