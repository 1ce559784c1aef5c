//! Role-by-role path generation, the combinatorial core.
//!
//! A path walks the configured role sequence and at each position consumes
//! the not-yet-consumed events of the preceding position, applies the
//! merge/split cardinality for that position, and appends the new events to
//! the position's sub-batches. Correspondence across fan-out boundaries is
//! carried by branch tags on the events themselves; the cardinality check in
//! `PathConfig` guarantees the counts line up before generation starts.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rand::Rng;
use tracing::warn;

use catchtrace_core::{
    BranchId, Event, EventKind, LineageKey, ParticipantId, PathConfig, Role,
};

use crate::errors::GenerationError;
use crate::factory::{self, TransformationInputs};
use crate::fields;
use crate::participants::{Participant, ParticipantPools};

/// One homogeneous run of events at a path position. Processor positions
/// carry three sub-batches (processing, packing, shipment); most positions
/// carry one.
#[derive(Debug, Clone)]
pub struct Batch {
    pub kind: EventKind,
    pub events: Vec<Event>,
}

impl Batch {
    fn new(kind: EventKind) -> Self {
        Self {
            kind,
            events: Vec::new(),
        }
    }
}

/// Mutable working state of one sample path.
///
/// Tracks, per position, the accumulated sub-batches plus a cursor into the
/// final sub-batch marking how many of its events downstream positions have
/// already consumed. Merge repetition appends repeatedly into the same
/// sub-batches, so the cursors survive across passes.
#[derive(Debug)]
pub struct PathState {
    positions: Vec<Vec<Batch>>,
    consumed: Vec<usize>,
    remaining_weight: HashMap<String, i64>,
    lanes: u32,
}

impl PathState {
    fn new(len: usize) -> Self {
        Self {
            positions: vec![Vec::new(); len],
            consumed: vec![0; len],
            remaining_weight: HashMap::new(),
            lanes: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sub-batches accumulated at a position so far.
    pub fn batches(&self, position: usize) -> &[Batch] {
        &self.positions[position]
    }

    pub fn into_positions(self) -> Vec<Vec<Batch>> {
        self.positions
    }

    fn new_lane(&mut self) -> BranchId {
        let lane = BranchId(self.lanes);
        self.lanes += 1;
        lane
    }

    fn append(&mut self, position: usize, kind: EventKind, events: Vec<Event>) {
        let batches = &mut self.positions[position];
        match batches.iter_mut().find(|batch| batch.kind == kind) {
            Some(batch) => batch.events.extend(events),
            None => {
                let mut batch = Batch::new(kind);
                batch.events = events;
                batches.push(batch);
            }
        }
    }

    fn final_batch(&self, position: usize) -> Option<&Batch> {
        self.positions[position].last()
    }

    /// Take one unconsumed event from the position's final sub-batch.
    fn consume_one(&mut self, position: usize) -> Option<Event> {
        let cursor = self.consumed[position];
        let event = self.final_batch(position)?.events.get(cursor).cloned()?;
        self.consumed[position] = cursor + 1;
        Some(event)
    }

    /// Take every unconsumed event from the position's final sub-batch.
    fn consume_all(&mut self, position: usize) -> Vec<Event> {
        let cursor = self.consumed[position];
        let events: Vec<Event> = self
            .final_batch(position)
            .map(|batch| batch.events[cursor..].to_vec())
            .unwrap_or_default();
        self.consumed[position] = cursor + events.len();
        events
    }

    /// Patch an already-stored event once its receiving stage is known:
    /// the create-then-backfill step made explicit.
    fn backfill(&mut self, position: usize, event_id: &str, receiver: &ParticipantId) {
        for batch in &mut self.positions[position] {
            for event in &mut batch.events {
                if event.event_id == event_id {
                    event.next_participant = Some(receiver.clone());
                    event.set_customer(receiver.clone());
                }
            }
        }
    }

    /// Patch only the next hop of an already-stored event. Carriers move
    /// goods without receiving them, so the event's customer stays the final
    /// recipient drawn at creation time.
    fn backfill_next(&mut self, position: usize, event_id: &str, carrier: &ParticipantId) {
        for batch in &mut self.positions[position] {
            for event in &mut batch.events {
                if event.event_id == event_id {
                    event.next_participant = Some(carrier.clone());
                }
            }
        }
    }
}

/// Customer/carrier draw honoring the participant-reuse flag: with reuse on,
/// every branch at a fan-out point gets the first draw; with it off, each
/// branch draws fresh.
struct ReuseDraw<'a> {
    pools: &'a ParticipantPools,
    role: Role,
    reuse: bool,
    first: Option<&'a Participant>,
}

impl<'a> ReuseDraw<'a> {
    fn new(pools: &'a ParticipantPools, role: Role, reuse: bool) -> Self {
        Self {
            pools,
            role,
            reuse,
            first: None,
        }
    }

    fn next(&mut self, rng: &mut impl Rng) -> &'a Participant {
        if self.reuse {
            if let Some(first) = self.first {
                return first;
            }
        }
        let drawn = self.pools.draw(self.role, rng);
        if self.first.is_none() {
            self.first = Some(drawn);
        }
        drawn
    }
}

/// Drives one sample path through the configured role sequence.
pub struct PathGenerator<'a> {
    config: &'a PathConfig,
    pools: &'a ParticipantPools,
}

impl<'a> PathGenerator<'a> {
    pub fn new(config: &'a PathConfig, pools: &'a ParticipantPools) -> Self {
        Self { config, pools }
    }

    /// Generate one complete path. With a merge factor M configured, the
    /// sub-path before the merge point runs M times into the same state, so
    /// the merge position finds M unconsumed upstream lots waiting.
    pub fn generate(
        &self,
        rng: &mut impl Rng,
        base_time: NaiveDateTime,
    ) -> Result<PathState, GenerationError> {
        let mut state = PathState::new(self.config.len());
        let (merge_point, merge_num) = self.config.merge_point().unwrap_or((0, 1));
        for _ in 0..merge_num {
            self.run_span(&mut state, rng, base_time, 0, merge_point)?;
        }
        self.run_span(&mut state, rng, base_time, merge_point, self.config.len())?;
        Ok(state)
    }

    fn run_span(
        &self,
        state: &mut PathState,
        rng: &mut impl Rng,
        base_time: NaiveDateTime,
        start: usize,
        end: usize,
    ) -> Result<(), GenerationError> {
        for position in start..end {
            match self.config.role_at(position) {
                Some(Role::Vessel) => self.step_vessel(state, rng, base_time, position),
                Some(Role::Auction) => self.step_auction(state, rng, position)?,
                Some(Role::Logistics) => self.step_logistics(state, rng, position)?,
                Some(Role::Processor) => self.step_processor(state, rng, position)?,
                Some(Role::Distributor) => self.step_distributor(state, rng, position)?,
                Some(Role::Retailer) => self.step_retailer(state, rng, position)?,
                None => {
                    return Err(GenerationError::MissingLink {
                        position,
                        detail: "position outside the configured path".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn step_vessel(
        &self,
        state: &mut PathState,
        rng: &mut impl Rng,
        base_time: NaiveDateTime,
        position: usize,
    ) {
        // With reuse on, every merge pass departs from the same vessel.
        let existing = state
            .final_batch(position)
            .and_then(|batch| batch.events.first())
            .map(|event| event.generator_id.clone());
        let vessel = match existing.filter(|_| self.config.reuse_participants()) {
            Some(id) => self.resolve(Role::Vessel, Some(&id), rng),
            None => self.pools.draw(Role::Vessel, rng).clone(),
        };

        let lane = state.new_lane();
        let event = factory::catch(rng, &vessel, lane, base_time);
        state
            .remaining_weight
            .insert(event.event_id.clone(), event.measure().value());
        state.append(position, EventKind::Catch, vec![event]);
    }

    fn step_auction(
        &self,
        state: &mut PathState,
        rng: &mut impl Rng,
        position: usize,
    ) -> Result<(), GenerationError> {
        let predecessor = state.consume_one(position - 1).ok_or_else(|| {
            GenerationError::MissingLink {
                position,
                detail: "no unconsumed catch upstream of the auction".to_string(),
            }
        })?;

        let existing = state
            .final_batch(position)
            .and_then(|batch| batch.events.first())
            .map(|event| event.generator_id.clone());
        let auction = match existing.filter(|_| self.config.reuse_participants()) {
            Some(id) => self.resolve(Role::Auction, Some(&id), rng),
            None => self.pools.draw(Role::Auction, rng).clone(),
        };
        state.backfill(position - 1, &predecessor.event_id, &auction.id);

        let customer_role = self.customer_role(position)?;
        let mut customers =
            ReuseDraw::new(self.pools, customer_role, self.config.reuse_participants());

        let split = self.config.path_split_eff(position);
        let share = predecessor.measure().value() / i64::from(split);
        let mut events = Vec::with_capacity(split as usize);
        for _ in 0..split {
            let remaining = state
                .remaining_weight
                .get(&predecessor.event_id)
                .copied()
                .unwrap_or(0);
            let customer = customers.next(rng).id.clone();
            let branch = if split > 1 {
                state.new_lane()
            } else {
                predecessor.branch
            };
            match factory::sale(rng, &predecessor, remaining, share, &auction, customer, branch) {
                Some(sale) => {
                    state
                        .remaining_weight
                        .insert(predecessor.event_id.clone(), remaining - sale.measure().value());
                    events.push(sale);
                }
                None => {
                    warn!(position, lot = %predecessor.event_id, "lot exhausted, sale skipped");
                }
            }
        }
        state.append(position, EventKind::Sale, events);
        Ok(())
    }

    fn step_logistics(
        &self,
        state: &mut PathState,
        rng: &mut impl Rng,
        position: usize,
    ) -> Result<(), GenerationError> {
        let predecessors = state.consume_all(position - 1);
        if predecessors.is_empty() {
            return Err(GenerationError::MissingLink {
                position,
                detail: "nothing upstream to transport".to_string(),
            });
        }

        let mut carriers =
            ReuseDraw::new(self.pools, Role::Logistics, self.config.reuse_participants());
        let customer_role = self.config.customer_role_after(position);

        let mut events = Vec::with_capacity(predecessors.len());
        for predecessor in predecessors {
            let carrier = carriers.next(rng).id.clone();
            let customer = match predecessor.customer_id() {
                Some(id) => id.clone(),
                None => match customer_role {
                    Some(role) => self.pools.draw(role, rng).id.clone(),
                    None => carrier.clone(),
                },
            };
            state.backfill_next(position - 1, &predecessor.event_id, &carrier);
            events.push(factory::transport(rng, &predecessor, carrier, customer));
        }
        state.append(position, EventKind::Transport, events);
        Ok(())
    }

    fn step_processor(
        &self,
        state: &mut PathState,
        rng: &mut impl Rng,
        position: usize,
    ) -> Result<(), GenerationError> {
        let predecessors = state.consume_all(position - 1);
        if predecessors.is_empty() {
            return Err(GenerationError::MissingLink {
                position,
                detail: "no upstream lots to transform".to_string(),
            });
        }

        // The factory is whoever the upstream stage already shipped to.
        let hint = predecessors[0].customer_id().cloned();
        let factory_participant = self.resolve(Role::Processor, hint.as_ref(), rng);
        for predecessor in &predecessors {
            state.backfill(position - 1, &predecessor.event_id, &factory_participant.id);
        }

        let inputs = merge_inputs(&predecessors);
        let branch = merged_branch(state, &predecessors);
        let processing = factory::processing(
            rng,
            &factory_participant,
            &inputs,
            self.config.product_split_eff(position),
            branch,
        );
        let packs = factory::pack_outputs(rng, &processing, &factory_participant);
        state.append(position, EventKind::Processing, vec![processing]);
        state.append(position, EventKind::Packing, packs.clone());

        self.fan_out_shipments(state, rng, position, &factory_participant, &packs)
    }

    fn step_distributor(
        &self,
        state: &mut PathState,
        rng: &mut impl Rng,
        position: usize,
    ) -> Result<(), GenerationError> {
        let predecessors = state.consume_all(position - 1);
        if predecessors.is_empty() {
            return Err(GenerationError::MissingLink {
                position,
                detail: "no upstream lots to distribute".to_string(),
            });
        }

        let hint = predecessors[0].customer_id().cloned();
        let distributor = self.resolve(Role::Distributor, hint.as_ref(), rng);
        for predecessor in &predecessors {
            state.backfill(position - 1, &predecessor.event_id, &distributor.id);
        }

        let pass_through = self.config.merge_at(position) == 0
            && self.config.product_split_at(position) == 0;
        let last_events = if pass_through {
            predecessors
        } else {
            let inputs = merge_inputs(&predecessors);
            let previous = distinct(&inputs.upstream_keys);
            let new_key = match previous.as_slice() {
                [only] => only.clone(),
                _ => fields::lineage_key(rng),
            };
            let branch = merged_branch(state, &predecessors);
            let repack = factory::repack(
                rng,
                &distributor,
                inputs.product_ids.clone(),
                previous,
                new_key,
                inputs.latest_time,
                branch,
            );
            state.append(position, EventKind::Packing, vec![repack.clone()]);
            vec![repack]
        };

        self.fan_out_shipments(state, rng, position, &distributor, &last_events)
    }

    fn step_retailer(
        &self,
        state: &mut PathState,
        rng: &mut impl Rng,
        position: usize,
    ) -> Result<(), GenerationError> {
        let predecessors = state.consume_all(position - 1);
        if predecessors.is_empty() {
            return Err(GenerationError::MissingLink {
                position,
                detail: "nothing upstream to sell".to_string(),
            });
        }

        let mut events = Vec::with_capacity(predecessors.len());
        for predecessor in predecessors {
            let hint = predecessor.customer_id().cloned();
            let retailer = self.resolve(Role::Retailer, hint.as_ref(), rng);
            state.backfill(position - 1, &predecessor.event_id, &retailer.id);
            events.push(factory::retail(rng, &predecessor, retailer.id, 1));
        }
        state.append(position, EventKind::Retail, events);
        Ok(())
    }

    /// Per-branch outbound shipments shared by the Processor and Distributor
    /// steps: each last event fans out into `split_path` branches, each with
    /// a floor-divided quantity share and, when fanning out, a fresh lineage
    /// key and branch lane.
    fn fan_out_shipments(
        &self,
        state: &mut PathState,
        rng: &mut impl Rng,
        position: usize,
        supplier: &Participant,
        last_events: &[Event],
    ) -> Result<(), GenerationError> {
        let customer_role = self.customer_role(position)?;
        let mut customers =
            ReuseDraw::new(self.pools, customer_role, self.config.reuse_participants());
        let mut carriers =
            ReuseDraw::new(self.pools, Role::Logistics, self.config.reuse_participants());

        let split = self.config.path_split_eff(position);
        let mut events = Vec::with_capacity(last_events.len() * split as usize);
        for last in last_events {
            let share = last.measure().value() / i64::from(split);
            for _ in 0..split {
                let new_key = if split > 1 {
                    fields::lineage_key(rng)
                } else {
                    last.new_key.clone()
                };
                let branch = if split > 1 { state.new_lane() } else { last.branch };
                let carrier = carriers.next(rng).id.clone();
                let customer = customers.next(rng).id.clone();
                events.push(factory::shipment(
                    rng,
                    last,
                    carrier,
                    supplier.id.clone(),
                    customer,
                    share,
                    new_key,
                    branch,
                ));
            }
        }
        state.append(position, EventKind::Shipment, events);
        Ok(())
    }

    fn customer_role(&self, position: usize) -> Result<Role, GenerationError> {
        self.config
            .customer_role_after(position)
            .ok_or_else(|| GenerationError::MissingLink {
                position,
                detail: "no downstream role to receive the goods".to_string(),
            })
    }

    /// Resolve a stage's own participant: the upstream customer when it maps
    /// into the role's pool, else a fresh draw.
    fn resolve(&self, role: Role, hint: Option<&ParticipantId>, rng: &mut impl Rng) -> Participant {
        hint.and_then(|id| {
            self.pools
                .of(role)
                .iter()
                .find(|participant| participant.id == *id)
        })
        .unwrap_or_else(|| self.pools.draw(role, rng))
        .clone()
    }
}

fn merge_inputs(predecessors: &[Event]) -> TransformationInputs {
    TransformationInputs {
        product_ids: predecessors
            .iter()
            .filter_map(|event| event.continued_product_ids().first().cloned())
            .collect(),
        generator_ids: predecessors
            .iter()
            .map(|event| event.generator_id.clone())
            .collect(),
        upstream_keys: predecessors
            .iter()
            .map(|event| event.new_key.clone())
            .collect(),
        latest_time: predecessors
            .iter()
            .map(|event| event.event_time)
            .max()
            .unwrap_or_default(),
    }
}

/// Branch for an event combining upstream lots: inherited when every input
/// sits on one lane, fresh when lanes converge.
fn merged_branch(state: &mut PathState, predecessors: &[Event]) -> BranchId {
    let first = predecessors[0].branch;
    if predecessors.iter().all(|event| event.branch == first) {
        first
    } else {
        state.new_lane()
    }
}

fn distinct(keys: &[LineageKey]) -> Vec<LineageKey> {
    let mut out = Vec::new();
    for key in keys {
        if !out.contains(key) {
            out.push(key.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn run(
        pis: &str,
        merge: &str,
        split_gtin: &str,
        split_pi: &str,
        reuse: bool,
        seed: u64,
    ) -> PathState {
        let config = PathConfig::parse(pis, merge, split_gtin, split_pi, reuse).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pools = ParticipantPools::generate(&mut rng);
        PathGenerator::new(&config, &pools)
            .generate(&mut rng, base_time())
            .unwrap()
    }

    fn sole_event(batch: &Batch) -> &Event {
        assert_eq!(batch.events.len(), 1, "expected a single event");
        &batch.events[0]
    }

    #[test]
    fn linear_chain_produces_one_event_per_stage() {
        let state = run("123456", "000000", "000000", "000000", false, 7);

        assert_eq!(state.batches(0).len(), 1);
        assert_eq!(state.batches(1).len(), 1);
        assert_eq!(state.batches(2).len(), 1);
        // Processor carries processing + packing + shipment sub-batches.
        assert_eq!(state.batches(3).len(), 3);
        assert_eq!(state.batches(4).len(), 1);
        assert_eq!(state.batches(5).len(), 1);

        let catch = sole_event(&state.batches(0)[0]);
        for position in 0..state.len() {
            for batch in state.batches(position) {
                let event = sole_event(batch);
                assert_eq!(event.new_key, catch.new_key, "pass-through key broken");
            }
        }
    }

    #[test]
    fn event_times_strictly_increase_along_the_chain() {
        let state = run("123456", "000000", "000000", "000000", false, 8);
        let mut previous = None;
        for position in 0..state.len() {
            for batch in state.batches(position) {
                let event = sole_event(batch);
                if let Some(time) = previous {
                    assert!(event.event_time > time);
                }
                previous = Some(event.event_time);
            }
        }
    }

    #[test]
    fn chain_links_match_the_upstream_event() {
        let state = run("123456", "000000", "000000", "000000", false, 9);
        let catch = sole_event(&state.batches(0)[0]);
        let sale = sole_event(&state.batches(1)[0]);
        assert_eq!(sale.previous_keys, vec![catch.new_key.clone()]);
        assert_eq!(catch.next_participant, Some(sale.generator_id.clone()));

        let transport = sole_event(&state.batches(2)[0]);
        assert_eq!(transport.previous_keys, vec![sale.new_key.clone()]);
    }

    #[test]
    fn auction_path_split_fans_out_and_conserves_weight() {
        let state = run("123456", "000000", "000000", "030000", false, 10);

        let catch = sole_event(&state.batches(0)[0]);
        let sales = &state.batches(1)[0].events;
        assert_eq!(sales.len(), 3);

        let total: i64 = sales.iter().map(|sale| sale.measure().value()).sum();
        assert!(total <= catch.measure().value());

        let mut branches: Vec<BranchId> = sales.iter().map(|sale| sale.branch).collect();
        branches.dedup();
        assert_eq!(branches.len(), 3, "each sale rides its own lane");

        // Each sale gets its own transport downstream.
        assert_eq!(state.batches(2)[0].events.len(), 3);
    }

    #[test]
    fn processor_merge_combines_all_upstream_lots() {
        let state = run("123436", "000200", "000000", "000000", false, 11);

        // Two passes before the merge point.
        assert_eq!(state.batches(0)[0].events.len(), 2);
        assert_eq!(state.batches(1)[0].events.len(), 2);
        assert_eq!(state.batches(2)[0].events.len(), 2);

        let transports = &state.batches(2)[0].events;
        let processing = sole_event(&state.batches(3)[0]);
        assert_eq!(processing.kind(), EventKind::Processing);
        assert_eq!(processing.previous_keys.len(), 2);
        for transport in transports {
            assert!(processing.previous_keys.contains(&transport.new_key));
            assert_ne!(processing.new_key, transport.new_key);
        }
        if let catchtrace_core::EventBody::Processing {
            input_product_ids, ..
        } = &processing.body
        {
            assert_eq!(input_product_ids.len(), 2);
        } else {
            panic!("expected a processing body");
        }
    }

    #[test]
    fn product_split_mints_a_key_per_pack() {
        let state = run("123436", "000000", "000200", "000000", false, 12);

        let packs = &state.batches(3)[1].events;
        assert_eq!(packs.len(), 2);
        assert_ne!(packs[0].new_key, packs[1].new_key);

        // One shipment per pack, each one transported onward.
        assert_eq!(state.batches(3)[2].events.len(), 2);
        assert_eq!(state.batches(4)[0].events.len(), 2);
    }

    #[test]
    fn distributor_passes_through_without_repack_when_unconfigured() {
        let state = run("123456", "000000", "000000", "000000", false, 13);
        let batches = state.batches(4);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].kind, EventKind::Shipment);
    }

    #[test]
    fn distributor_split_shares_quantity_across_branches() {
        let state = run("123456", "000000", "000000", "000020", false, 14);

        let processor_shipment = sole_event(&state.batches(3)[2]);
        let shipments = &state.batches(4)[0].events;
        assert_eq!(shipments.len(), 2);
        let total: i64 = shipments.iter().map(|s| s.measure().value()).sum();
        assert!(total <= processor_shipment.measure().value());
        assert_ne!(shipments[0].new_key, shipments[1].new_key);
        for shipment in shipments {
            assert_ne!(shipment.new_key, processor_shipment.new_key);
        }

        // Terminal retail sells each branch separately.
        assert_eq!(state.batches(5)[0].events.len(), 2);
    }

    #[test]
    fn logistics_backfill_keeps_the_sale_customer() {
        let config =
            PathConfig::parse("123456", "000000", "000000", "000000", false).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let pools = ParticipantPools::generate(&mut rng);
        let state = PathGenerator::new(&config, &pools)
            .generate(&mut rng, base_time())
            .unwrap();

        let sale = sole_event(&state.batches(1)[0]);
        let customer = sale.customer_id().expect("sale has a customer").clone();
        assert!(
            pools.of(Role::Processor).iter().any(|p| p.id == customer),
            "sale customer must stay the processing-stage recipient"
        );
        assert!(!pools.of(Role::Logistics).iter().any(|p| p.id == customer));

        // The carrier is recorded as the next hop, nothing more.
        let next = sale.next_participant.clone().expect("next hop patched");
        assert!(pools.of(Role::Logistics).iter().any(|p| p.id == next));
    }

    #[test]
    fn logistics_backfill_keeps_the_shipment_customer() {
        let config =
            PathConfig::parse("123436", "000000", "000000", "000000", false).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let pools = ParticipantPools::generate(&mut rng);
        let state = PathGenerator::new(&config, &pools)
            .generate(&mut rng, base_time())
            .unwrap();

        let shipment = sole_event(&state.batches(3)[2]);
        let customer = shipment.customer_id().expect("shipment has a customer").clone();
        assert!(pools.of(Role::Retailer).iter().any(|p| p.id == customer));
        assert!(!pools.of(Role::Logistics).iter().any(|p| p.id == customer));
    }

    #[test]
    fn reuse_flag_pins_the_customer_across_branches() {
        let state = run("123456", "000000", "000000", "030000", true, 15);
        let sales = &state.batches(1)[0].events;
        let first = sales[0].customer_id().cloned();
        for sale in sales {
            assert_eq!(sale.customer_id().cloned(), first);
        }
    }

    #[test]
    fn seeded_runs_are_identical() {
        let a = run("123456", "000000", "000200", "000020", false, 16);
        let b = run("123456", "000000", "000200", "000020", false, 16);
        for position in 0..a.len() {
            let left: Vec<String> = a.batches(position)
                .iter()
                .flat_map(|batch| batch.events.iter())
                .map(|event| serde_json::to_string(event).unwrap())
                .collect();
            let right: Vec<String> = b.batches(position)
                .iter()
                .flat_map(|batch| batch.events.iter())
                .map(|event| serde_json::to_string(event).unwrap())
                .collect();
            assert_eq!(left, right);
        }
    }
}
