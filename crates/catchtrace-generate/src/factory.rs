//! Event constructors, one per record kind.
//!
//! Each constructor takes the causal predecessor (or none, for the origin)
//! plus role-specific linking identifiers and returns fully populated,
//! immutable records. Back-patching of upstream participants is the path
//! generator's job, not the factory's.

use chrono::NaiveDateTime;
use rand::Rng;

use catchtrace_core::{BranchId, Event, EventBody, LineageKey, ParticipantId, Role};

use crate::fields;
use crate::participants::{Participant, pick_location};

/// Origin catch event. Mints a brand-new lineage key; no predecessor.
pub fn catch(
    rng: &mut impl Rng,
    vessel: &Participant,
    branch: BranchId,
    base_time: NaiveDateTime,
) -> Event {
    let key = fields::lineage_key(rng);
    let (city, coordinate) = pick_location(Role::Vessel, rng);
    let catch_date = base_time.date();
    Event {
        event_id: fields::event_id(rng),
        previous_keys: vec![key.clone()],
        new_key: key,
        branch,
        event_time: base_time,
        location_name: city.to_string(),
        location_coordinate: coordinate.to_string(),
        generator_id: vessel.id.clone(),
        last_participants: Vec::new(),
        next_participant: None,
        company_name: vessel.name.clone(),
        body: EventBody::Catch {
            vessel_id: vessel.id.clone(),
            product_id: fields::product_code(rng),
            serial_number: fields::serial_number(rng),
            weight: fields::catch_weight(rng),
            catch_date,
            species: fields::species(rng).to_string(),
            economic_zone: fields::participant_code(rng),
            first_freeze_date: catch_date,
            catch_certificate_id: fields::product_code(rng),
            conservation_reference_size: fields::conservation_size(rng),
            catch_area: fields::participant_code(rng),
            owner_name: free_text7(rng),
        },
    }
}

/// Auction sale. Clamps the requested weight to what remains of the lot and
/// returns `None` when the lot is already exhausted (a defined no-op, not an
/// error). Lineage passes through unchanged.
pub fn sale(
    rng: &mut impl Rng,
    predecessor: &Event,
    remaining_weight: i64,
    requested_weight: i64,
    auction: &Participant,
    customer: ParticipantId,
    branch: BranchId,
) -> Option<Event> {
    if remaining_weight <= 0 {
        return None;
    }
    let weight = requested_weight.min(remaining_weight);
    let (city, coordinate) = pick_location(Role::Auction, rng);
    Some(Event {
        event_id: fields::event_id(rng),
        previous_keys: vec![predecessor.new_key.clone()],
        new_key: predecessor.new_key.clone(),
        branch,
        event_time: fields::day_after(predecessor.event_time),
        location_name: city.to_string(),
        location_coordinate: coordinate.to_string(),
        generator_id: auction.id.clone(),
        last_participants: vec![predecessor.generator_id.clone()],
        next_participant: None,
        company_name: auction.name.clone(),
        body: EventBody::Sale {
            auction_id: auction.id.clone(),
            supplier_id: predecessor.generator_id.clone(),
            customer_id: customer,
            product_id: first_product(predecessor),
            serial_number: predecessor.serial_number().to_string(),
            weight,
            product_name: fields::free_text(rng, 5).unwrap_or_default(),
        },
    })
}

/// Transport hop. Carries the predecessor's measure through unchanged
/// (quantity preferred, weight fallback) and advances time by one day.
pub fn transport(
    rng: &mut impl Rng,
    predecessor: &Event,
    carrier: ParticipantId,
    customer: ParticipantId,
) -> Event {
    Event {
        event_id: fields::event_id(rng),
        previous_keys: vec![predecessor.new_key.clone()],
        new_key: predecessor.new_key.clone(),
        branch: predecessor.branch,
        event_time: fields::day_after(predecessor.event_time),
        // In transit: no fixed location.
        location_name: String::new(),
        location_coordinate: String::new(),
        generator_id: carrier.clone(),
        last_participants: vec![predecessor.generator_id.clone()],
        next_participant: Some(customer.clone()),
        company_name: free_text7(rng),
        body: EventBody::Transport {
            supplier_id: predecessor.supplier_id().clone(),
            customer_id: customer,
            carrier_id: carrier,
            pallet_id: fields::pallet_code(rng),
            product_id: first_product(predecessor),
            serial_number: predecessor.serial_number().to_string(),
            weight: predecessor.measure().value(),
            destination_id: fields::participant_code(rng),
            departure_id: fields::participant_code(rng),
            temperature: fields::transport_temperature(rng),
        },
    }
}

/// Inputs to a transformation: one entry per merged upstream lot.
#[derive(Debug, Clone)]
pub struct TransformationInputs {
    pub product_ids: Vec<String>,
    pub generator_ids: Vec<ParticipantId>,
    pub upstream_keys: Vec<LineageKey>,
    pub latest_time: NaiveDateTime,
}

/// Processing transformation. With more than one distinct upstream key this
/// is a merge record: a fresh key is minted and every upstream key is kept
/// as a previous reference. Mints `output_count` fresh output product codes.
pub fn processing(
    rng: &mut impl Rng,
    factory: &Participant,
    inputs: &TransformationInputs,
    output_count: u32,
    branch: BranchId,
) -> Event {
    let distinct_previous = distinct_keys(&inputs.upstream_keys);
    let new_key = match distinct_previous.as_slice() {
        [only] => only.clone(),
        _ => fields::lineage_key(rng),
    };

    let output_product_ids = (0..output_count)
        .map(|_| fields::product_code(rng))
        .collect();
    let (city, coordinate) = pick_location(Role::Processor, rng);
    let event_time = fields::day_after(inputs.latest_time);
    Event {
        event_id: fields::event_id(rng),
        previous_keys: distinct_previous,
        new_key,
        branch,
        event_time,
        location_name: city.to_string(),
        location_coordinate: coordinate.to_string(),
        generator_id: factory.id.clone(),
        last_participants: inputs.generator_ids.clone(),
        next_participant: Some(factory.id.clone()),
        company_name: factory.name.clone(),
        body: EventBody::Processing {
            factory_id: factory.id.clone(),
            input_product_ids: inputs.product_ids.clone(),
            output_product_ids,
            serial_number: fields::serial_number(rng),
            quantity: fields::batch_quantity(rng),
            brand_name: fields::free_text(rng, 10).unwrap_or_default(),
            product_method: fields::free_text(rng, 3).unwrap_or_default(),
            ingredient_statement: fields::free_text(rng, 20).unwrap_or_default(),
            storage_state: "PREVIOUSLY_FROZEN".to_string(),
            expiration_date: fields::days_after(event_time, 60).date(),
        },
    }
}

/// One packing event per output product of a transformation. Each gets a
/// fresh lineage key when the transformation produced more than one output,
/// else inherits the sole upstream key.
pub fn pack_outputs(rng: &mut impl Rng, processing: &Event, packer: &Participant) -> Vec<Event> {
    let outputs = processing.continued_product_ids().to_vec();
    let fan_out = outputs.len() > 1;
    outputs
        .iter()
        .map(|input_id| {
            let new_key = if fan_out {
                fields::lineage_key(rng)
            } else {
                processing.new_key.clone()
            };
            Event {
                event_id: fields::event_id(rng),
                previous_keys: vec![processing.new_key.clone()],
                new_key,
                branch: processing.branch,
                event_time: fields::day_after(processing.event_time),
                location_name: processing.location_name.clone(),
                location_coordinate: processing.location_coordinate.clone(),
                generator_id: packer.id.clone(),
                last_participants: vec![packer.id.clone()],
                next_participant: Some(packer.id.clone()),
                company_name: packer.name.clone(),
                body: packing_body(rng, packer, vec![input_id.clone()], 1),
            }
        })
        .collect()
}

/// Repack over an arbitrary input set with caller-decided lineage: the
/// caller forces merge semantics at the packing boundary by supplying the
/// previous keys and the new key.
pub fn repack(
    rng: &mut impl Rng,
    packer: &Participant,
    input_product_ids: Vec<String>,
    previous_keys: Vec<LineageKey>,
    new_key: LineageKey,
    base_time: NaiveDateTime,
    branch: BranchId,
) -> Event {
    let (city, coordinate) = pick_location(Role::Distributor, rng);
    Event {
        event_id: fields::event_id(rng),
        previous_keys,
        new_key,
        branch,
        event_time: fields::day_after(base_time),
        location_name: city.to_string(),
        location_coordinate: coordinate.to_string(),
        generator_id: packer.id.clone(),
        last_participants: Vec::new(),
        next_participant: Some(packer.id.clone()),
        company_name: packer.name.clone(),
        body: packing_body(rng, packer, input_product_ids, 1),
    }
}

/// Outbound shipment. The caller decides whether this hop is a path split
/// (fresh key per branch) or a continuation (predecessor's key).
pub fn shipment(
    rng: &mut impl Rng,
    predecessor: &Event,
    carrier: ParticipantId,
    supplier: ParticipantId,
    customer: ParticipantId,
    quantity: i64,
    new_key: LineageKey,
    branch: BranchId,
) -> Event {
    Event {
        event_id: fields::event_id(rng),
        previous_keys: vec![predecessor.new_key.clone()],
        new_key,
        branch,
        event_time: fields::day_after(predecessor.event_time),
        location_name: predecessor.location_name.clone(),
        location_coordinate: predecessor.location_coordinate.clone(),
        generator_id: supplier.clone(),
        last_participants: vec![supplier.clone()],
        next_participant: Some(carrier.clone()),
        company_name: predecessor.company_name.clone(),
        body: EventBody::Shipment {
            supplier_id: supplier,
            customer_id: customer,
            carrier_id: carrier,
            pallet_id: fields::pallet_code(rng),
            product_ids: predecessor.continued_product_ids().to_vec(),
            serial_number: predecessor.serial_number().to_string(),
            quantity,
            destination_id: fields::participant_code(rng),
            departure_id: fields::participant_code(rng),
            weight: fields::gross_weight(rng),
            temperature: fields::transport_temperature(rng),
        },
    }
}

/// Terminal retail sale. Never mints a key.
pub fn retail(
    rng: &mut impl Rng,
    predecessor: &Event,
    retailer: ParticipantId,
    quantity: i64,
) -> Event {
    let (city, coordinate) = pick_location(Role::Retailer, rng);
    Event {
        event_id: fields::event_id(rng),
        previous_keys: vec![predecessor.new_key.clone()],
        new_key: predecessor.new_key.clone(),
        branch: predecessor.branch,
        event_time: fields::day_after(predecessor.event_time),
        location_name: city.to_string(),
        location_coordinate: coordinate.to_string(),
        generator_id: retailer.clone(),
        last_participants: vec![retailer.clone()],
        next_participant: None,
        company_name: free_text7(rng),
        body: EventBody::Retail {
            retailer_id: retailer,
            product_ids: predecessor.continued_product_ids().to_vec(),
            serial_number: predecessor.serial_number().to_string(),
            quantity,
            price: fields::retail_price(rng),
        },
    }
}

fn packing_body(
    rng: &mut impl Rng,
    packer: &Participant,
    input_product_ids: Vec<String>,
    output_count: u32,
) -> EventBody {
    EventBody::Packing {
        packer_id: packer.id.clone(),
        input_product_ids,
        output_product_ids: (0..output_count).map(|_| fields::product_code(rng)).collect(),
        serial_number: fields::serial_number(rng),
        quantity: fields::pack_quantity(rng),
        net_content: fields::net_content(rng),
        packing_type_code: fields::upper_code(rng, 3).unwrap_or_default(),
        packing_material: "PLASTIC_THERMOPLASTICS".to_string(),
        recycling_process: "Recyclable".to_string(),
    }
}

fn free_text7(rng: &mut impl Rng) -> String {
    fields::free_text(rng, 7).unwrap_or_default()
}

fn first_product(event: &Event) -> String {
    event
        .continued_product_ids()
        .first()
        .cloned()
        .unwrap_or_default()
}

fn distinct_keys(keys: &[LineageKey]) -> Vec<LineageKey> {
    let mut distinct = Vec::new();
    for key in keys {
        if !distinct.contains(key) {
            distinct.push(key.clone());
        }
    }
    distinct
}
