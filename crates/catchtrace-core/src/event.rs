use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Logical key grouping every event descended from one originating lot.
///
/// Minted fresh exactly when a merge (more than one distinct upstream key)
/// or an unlinked path split occurs; carried through unchanged otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineageKey(String);

impl LineageKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LineageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A participant code (13 numeric digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag identifying which fan-out branch of a path an event belongs to.
///
/// Downstream stages resolve their predecessors by walking the events of the
/// preceding position directly; the branch tag is carried into the output so
/// dataset consumers can do the same without positional guesswork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(pub u32);

impl std::fmt::Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record type of one traceability event. A path position may emit more than
/// one kind: a processor position emits processing, packing, and shipment
/// sub-batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Catch,
    Sale,
    Transport,
    Processing,
    Packing,
    Shipment,
    Retail,
}

impl EventKind {
    /// Numeric event-type code carried in the output records.
    pub fn code(&self) -> u8 {
        match self {
            EventKind::Catch => 1,
            EventKind::Sale => 2,
            EventKind::Transport => 3,
            EventKind::Processing => 4,
            EventKind::Packing => 5,
            EventKind::Shipment => 6,
            EventKind::Retail => 7,
        }
    }
}

/// Magnitude carried by an event, preserving which field supplied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Quantity(i64),
    Weight(i64),
}

impl Measure {
    pub fn value(&self) -> i64 {
        match self {
            Measure::Quantity(value) | Measure::Weight(value) => *value,
        }
    }
}

/// Role-specific payload of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventBody {
    Catch {
        vessel_id: ParticipantId,
        product_id: String,
        serial_number: String,
        weight: i64,
        catch_date: NaiveDate,
        species: String,
        economic_zone: String,
        first_freeze_date: NaiveDate,
        catch_certificate_id: String,
        conservation_reference_size: String,
        catch_area: String,
        owner_name: String,
    },
    Sale {
        auction_id: ParticipantId,
        supplier_id: ParticipantId,
        customer_id: ParticipantId,
        product_id: String,
        serial_number: String,
        weight: i64,
        product_name: String,
    },
    Transport {
        supplier_id: ParticipantId,
        customer_id: ParticipantId,
        carrier_id: ParticipantId,
        pallet_id: String,
        product_id: String,
        serial_number: String,
        weight: i64,
        destination_id: String,
        departure_id: String,
        temperature: f64,
    },
    Processing {
        factory_id: ParticipantId,
        input_product_ids: Vec<String>,
        output_product_ids: Vec<String>,
        serial_number: String,
        quantity: i64,
        brand_name: String,
        product_method: String,
        ingredient_statement: String,
        storage_state: String,
        expiration_date: NaiveDate,
    },
    Packing {
        packer_id: ParticipantId,
        input_product_ids: Vec<String>,
        output_product_ids: Vec<String>,
        serial_number: String,
        quantity: i64,
        net_content: i64,
        packing_type_code: String,
        packing_material: String,
        recycling_process: String,
    },
    Shipment {
        supplier_id: ParticipantId,
        customer_id: ParticipantId,
        carrier_id: ParticipantId,
        pallet_id: String,
        product_ids: Vec<String>,
        serial_number: String,
        quantity: i64,
        destination_id: String,
        departure_id: String,
        weight: f64,
        temperature: f64,
    },
    Retail {
        retailer_id: ParticipantId,
        product_ids: Vec<String>,
        serial_number: String,
        quantity: i64,
        price: f64,
    },
}

/// One synthesized traceability record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub previous_keys: Vec<LineageKey>,
    pub new_key: LineageKey,
    pub branch: BranchId,
    pub event_time: NaiveDateTime,
    pub location_name: String,
    pub location_coordinate: String,
    pub generator_id: ParticipantId,
    pub last_participants: Vec<ParticipantId>,
    pub next_participant: Option<ParticipantId>,
    pub company_name: String,
    pub body: EventBody,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self.body {
            EventBody::Catch { .. } => EventKind::Catch,
            EventBody::Sale { .. } => EventKind::Sale,
            EventBody::Transport { .. } => EventKind::Transport,
            EventBody::Processing { .. } => EventKind::Processing,
            EventBody::Packing { .. } => EventKind::Packing,
            EventBody::Shipment { .. } => EventKind::Shipment,
            EventBody::Retail { .. } => EventKind::Retail,
        }
    }

    /// Magnitude carried downstream: quantity preferred, weight fallback.
    pub fn measure(&self) -> Measure {
        match &self.body {
            EventBody::Catch { weight, .. }
            | EventBody::Sale { weight, .. }
            | EventBody::Transport { weight, .. } => Measure::Weight(*weight),
            EventBody::Processing { quantity, .. }
            | EventBody::Packing { quantity, .. }
            | EventBody::Shipment { quantity, .. }
            | EventBody::Retail { quantity, .. } => Measure::Quantity(*quantity),
        }
    }

    /// Product identifiers a downstream stage continues with: the output
    /// identifiers when the event produced any, else its plain product id.
    pub fn continued_product_ids(&self) -> &[String] {
        match &self.body {
            EventBody::Catch { product_id, .. }
            | EventBody::Sale { product_id, .. }
            | EventBody::Transport { product_id, .. } => std::slice::from_ref(product_id),
            EventBody::Processing {
                output_product_ids, ..
            }
            | EventBody::Packing {
                output_product_ids, ..
            } => output_product_ids,
            EventBody::Shipment { product_ids, .. } | EventBody::Retail { product_ids, .. } => {
                product_ids
            }
        }
    }

    pub fn serial_number(&self) -> &str {
        match &self.body {
            EventBody::Catch { serial_number, .. }
            | EventBody::Sale { serial_number, .. }
            | EventBody::Transport { serial_number, .. }
            | EventBody::Processing { serial_number, .. }
            | EventBody::Packing { serial_number, .. }
            | EventBody::Shipment { serial_number, .. }
            | EventBody::Retail { serial_number, .. } => serial_number,
        }
    }

    /// The party that handed the goods over: the explicit supplier when the
    /// body carries one, else the event's generator.
    pub fn supplier_id(&self) -> &ParticipantId {
        match &self.body {
            EventBody::Sale { supplier_id, .. }
            | EventBody::Transport { supplier_id, .. }
            | EventBody::Shipment { supplier_id, .. } => supplier_id,
            _ => &self.generator_id,
        }
    }

    pub fn customer_id(&self) -> Option<&ParticipantId> {
        match &self.body {
            EventBody::Sale { customer_id, .. }
            | EventBody::Transport { customer_id, .. }
            | EventBody::Shipment { customer_id, .. } => Some(customer_id),
            _ => None,
        }
    }

    /// Backfill the customer once the downstream participant is known.
    /// No-op for bodies without a customer field.
    pub fn set_customer(&mut self, id: ParticipantId) {
        match &mut self.body {
            EventBody::Sale { customer_id, .. }
            | EventBody::Transport { customer_id, .. }
            | EventBody::Shipment { customer_id, .. } => *customer_id = id,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn header(body: EventBody) -> Event {
        Event {
            event_id: "e".to_string(),
            previous_keys: vec![LineageKey::new("k")],
            new_key: LineageKey::new("k"),
            branch: BranchId(0),
            event_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            location_name: String::new(),
            location_coordinate: String::new(),
            generator_id: ParticipantId::new("1"),
            last_participants: Vec::new(),
            next_participant: None,
            company_name: String::new(),
            body,
        }
    }

    #[test]
    fn measure_prefers_quantity_over_weight() {
        let shipment = header(EventBody::Shipment {
            supplier_id: ParticipantId::new("1"),
            customer_id: ParticipantId::new("2"),
            carrier_id: ParticipantId::new("3"),
            pallet_id: "0".to_string(),
            product_ids: vec!["p".to_string()],
            serial_number: "s".to_string(),
            quantity: 40,
            destination_id: "dest".to_string(),
            departure_id: "d".to_string(),
            weight: 55.5,
            temperature: -4.0,
        });
        assert_eq!(shipment.measure(), Measure::Quantity(40));

        let catch = header(EventBody::Catch {
            vessel_id: ParticipantId::new("1"),
            product_id: "p".to_string(),
            serial_number: "s".to_string(),
            weight: 900,
            catch_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            species: "Cod".to_string(),
            economic_zone: "z".to_string(),
            first_freeze_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            catch_certificate_id: "c".to_string(),
            conservation_reference_size: "20cm".to_string(),
            catch_area: "a".to_string(),
            owner_name: "o".to_string(),
        });
        assert_eq!(catch.measure(), Measure::Weight(900));
    }

    #[test]
    fn continued_products_fall_back_to_plain_product() {
        let packing = header(EventBody::Packing {
            packer_id: ParticipantId::new("1"),
            input_product_ids: vec!["in".to_string()],
            output_product_ids: vec!["out".to_string()],
            serial_number: "s".to_string(),
            quantity: 10,
            net_content: 4,
            packing_type_code: "BOX".to_string(),
            packing_material: "PLASTIC_THERMOPLASTICS".to_string(),
            recycling_process: "Recyclable".to_string(),
        });
        assert_eq!(packing.continued_product_ids(), ["out".to_string()]);

        let sale = header(EventBody::Sale {
            auction_id: ParticipantId::new("1"),
            supplier_id: ParticipantId::new("2"),
            customer_id: ParticipantId::new("3"),
            product_id: "plain".to_string(),
            serial_number: "s".to_string(),
            weight: 10,
            product_name: "fish".to_string(),
        });
        assert_eq!(sale.continued_product_ids(), ["plain".to_string()]);
    }
}
