use crate::{
    action::ActionKind,
    card::Card,
    events::{BlockDecision, Intent, Response, SmuggleDecision},
    game_state::{
        ExchangeInfo, GameState, PendingAction, PendingBlock, PendingReveal, Phase, RevealReason,
    },
    player::PlayerId,
    utils::{SliceExtensions, VecExtensions},
};

impl GameState {
    /// Processes exactly one player intent. Returns `true` iff the intent
    /// was accepted and the state changed; the session layer broadcasts a
    /// snapshot for every accepted intent. Anything that does not match the
    /// current phase, actor or payload is dropped without touching state,
    /// since duplicate and stale messages are expected under latency.
    pub fn handle_intent(&mut self, caller: PlayerId, intent: Intent) -> bool {
        if !self.is_seat(caller) {
            log::debug!("intent from unknown seat {} dropped", caller);
            return false;
        }
        let accepted = match intent {
            Intent::PerformAction { action, target } => {
                self.perform_action(caller, action, target)
            }
            Intent::ChallengeResponse { response } => self.challenge_response(caller, response),
            Intent::DeclareBlock { block } => self.declare_block(caller, block),
            Intent::BlockResponse { response } => self.block_response(caller, response),
            Intent::SmuggleResponse { response } => self.smuggle_response(caller, response),
            Intent::RevealCard { card } => self.reveal_card(caller, card),
            Intent::ReturnExchangeCards { kept } => self.return_exchange_cards(caller, kept),
        };
        if accepted {
            debug_assert!(self
                .players
                .iter()
                .all(|p| p.alive == !p.hand().is_empty()));
        } else {
            log::debug!(
                "intent from seat {} dropped in phase {:?}",
                caller,
                self.phase
            );
        }
        accepted
    }

    fn perform_action(
        &mut self,
        caller: PlayerId,
        kind: ActionKind,
        target: Option<PlayerId>,
    ) -> bool {
        if self.phase != Phase::Action || caller != self.turn {
            return false;
        }
        if !self.valid_target(caller, kind, target) {
            return false;
        }
        let cost = kind.cost();
        if self.players[caller].ducats < cost {
            return false;
        }
        self.players[caller].ducats -= cost;
        let actor_name = self.players[caller].name.clone();
        match kind {
            ActionKind::Harvest => {
                self.players[caller].ducats += 1;
                self.log
                    .record(format!("{} harvests crop for 1 ducat.", actor_name));
                self.advance_turn();
            }
            ActionKind::Overthrow => {
                let target = target.expect("overthrow target was validated");
                self.log.record(format!(
                    "{} pays 7 ducats to overthrow {}! This cannot be blocked.",
                    actor_name, self.players[target].name
                ));
                self.pending_reveal = Some(PendingReveal {
                    player: target,
                    reason: RevealReason::Overthrown,
                });
                self.phase = Phase::RevealCard;
            }
            ActionKind::Smuggle => {
                self.log
                    .record(format!("{} is attempting to smuggle goods.", actor_name));
                self.pending_action = Some(PendingAction {
                    kind,
                    actor: caller,
                    target: None,
                });
                self.reset_passed();
                self.phase = Phase::BlockDeclarationPeriod;
            }
            _ => {
                let claim = match kind {
                    ActionKind::Levy => format!(
                        "{} claims the Tax Collector to perform a levy.",
                        actor_name
                    ),
                    ActionKind::Attack => format!(
                        "{} claims the Warrior and pays 3 ducats to attack {}.",
                        actor_name,
                        self.players[target.expect("attack target was validated")].name
                    ),
                    ActionKind::Thieve => format!(
                        "{} claims the Thief to thieve from {}.",
                        actor_name,
                        self.players[target.expect("thieve target was validated")].name
                    ),
                    ActionKind::Exchange => format!(
                        "{} claims the Courtier to perform an exchange.",
                        actor_name
                    ),
                    _ => unreachable!("remaining kinds were handled above"),
                };
                self.log.record(claim);
                self.pending_action = Some(PendingAction {
                    kind,
                    actor: caller,
                    target,
                });
                self.reset_passed();
                self.phase = Phase::Challenge;
            }
        }
        true
    }

    fn valid_target(&self, caller: PlayerId, kind: ActionKind, target: Option<PlayerId>) -> bool {
        match target {
            Some(t) => {
                kind.needs_target() && self.is_seat(t) && t != caller && self.players[t].alive
            }
            None => !kind.needs_target(),
        }
    }

    fn challenge_response(&mut self, caller: PlayerId, response: Response) -> bool {
        if self.phase != Phase::Challenge {
            return false;
        }
        let pending = self
            .pending_action
            .expect("the challenge phase always has a pending action");
        if caller == pending.actor || !self.players[caller].alive || self.has_passed(caller) {
            return false;
        }
        match response {
            Response::Pass => {
                self.note_pass(caller);
                self.log
                    .record(format!("{} does not challenge.", self.players[caller].name));
                if self.sub_round_complete(pending.actor) {
                    self.log.record("The claim stands unchallenged.");
                    self.reset_passed();
                    self.claim_stands(pending);
                }
            }
            Response::Challenge => {
                let role = pending
                    .kind
                    .claimed_role()
                    .expect("the challenge phase implies a claimed role");
                self.log.record(format!(
                    "{} challenges {}'s claim to be a {}!",
                    self.players[caller].name, self.players[pending.actor].name, role
                ));
                self.reset_passed();
                if self.players[pending.actor].holds(role) {
                    self.swap_shown_card(pending.actor, role);
                    // the claim was true: the action stays pending and
                    // resumes once the challenger has revealed
                    self.pending_reveal = Some(PendingReveal {
                        player: caller,
                        reason: RevealReason::FailedChallenge,
                    });
                    self.phase = Phase::RevealCard;
                } else {
                    self.log.record(format!(
                        "{} was bluffing! The challenge succeeds.",
                        self.players[pending.actor].name
                    ));
                    self.players[pending.actor].ducats += pending.kind.cost();
                    self.pending_action = None;
                    self.pending_reveal = Some(PendingReveal {
                        player: pending.actor,
                        reason: RevealReason::CaughtBluffing,
                    });
                    self.phase = Phase::RevealCard;
                }
            }
        }
        true
    }

    fn claim_stands(&mut self, pending: PendingAction) {
        if pending.kind.is_blockable() {
            self.phase = Phase::DeclareBlock;
        } else if self.resolve_action(pending) {
            self.finish_turn();
        } else {
            self.pending_action = None;
        }
    }

    fn declare_block(&mut self, caller: PlayerId, block: BlockDecision) -> bool {
        if self.phase != Phase::DeclareBlock {
            return false;
        }
        let pending = self
            .pending_action
            .expect("the declare-block phase always has a pending action");
        if pending.target != Some(caller) {
            return false;
        }
        match block {
            BlockDecision::NoBlock => {
                self.log.record(format!(
                    "{} does not block the {}.",
                    self.players[caller].name, pending.kind
                ));
                if self.resolve_action(pending) {
                    self.finish_turn();
                } else {
                    self.pending_action = None;
                }
            }
            BlockDecision::Claim(role) => {
                if !pending.kind.blocked_by().contains(&role) {
                    return false;
                }
                self.log.record(format!(
                    "{} claims the {} to block the {}!",
                    self.players[caller].name, role, pending.kind
                ));
                self.pending_block = Some(PendingBlock {
                    blocker: caller,
                    claimed_role: role,
                });
                self.reset_passed();
                self.phase = Phase::BlockChallenge;
            }
        }
        true
    }

    fn smuggle_response(&mut self, caller: PlayerId, response: SmuggleDecision) -> bool {
        if self.phase != Phase::BlockDeclarationPeriod {
            return false;
        }
        let pending = self
            .pending_action
            .expect("the block-declaration phase always has a pending action");
        if caller == pending.actor || !self.players[caller].alive || self.has_passed(caller) {
            return false;
        }
        match response {
            SmuggleDecision::Block => {
                let role = pending.kind.blocked_by()[0];
                self.log.record(format!(
                    "{} claims the {} to block the smuggling!",
                    self.players[caller].name, role
                ));
                self.pending_block = Some(PendingBlock {
                    blocker: caller,
                    claimed_role: role,
                });
                self.reset_passed();
                self.phase = Phase::BlockChallenge;
            }
            SmuggleDecision::Pass => {
                self.note_pass(caller);
                self.log
                    .record(format!("{} does not block.", self.players[caller].name));
                if self.sub_round_complete(pending.actor) {
                    self.reset_passed();
                    if self.resolve_action(pending) {
                        self.finish_turn();
                    }
                }
            }
        }
        true
    }

    fn block_response(&mut self, caller: PlayerId, response: Response) -> bool {
        if self.phase != Phase::BlockChallenge {
            return false;
        }
        let block = self
            .pending_block
            .expect("the block-challenge phase always has a pending block");
        if caller == block.blocker || !self.players[caller].alive || self.has_passed(caller) {
            return false;
        }
        let pending = self
            .pending_action
            .expect("a block always counters a pending action");
        match response {
            Response::Pass => {
                self.note_pass(caller);
                self.log.record(format!(
                    "{} does not challenge the block.",
                    self.players[caller].name
                ));
                if self.sub_round_complete(block.blocker) {
                    self.log.record(format!(
                        "The block is not challenged. The {} is cancelled.",
                        pending.kind
                    ));
                    self.finish_turn();
                }
            }
            Response::Challenge => {
                self.log.record(format!(
                    "{} challenges {}'s block!",
                    self.players[caller].name, self.players[block.blocker].name
                ));
                self.reset_passed();
                self.pending_block = None;
                if self.players[block.blocker].holds(block.claimed_role) {
                    // the block was honest: the original action stays
                    // cancelled and the challenger pays for it
                    self.swap_shown_card(block.blocker, block.claimed_role);
                    self.pending_action = None;
                    self.pending_reveal = Some(PendingReveal {
                        player: caller,
                        reason: RevealReason::FailedBlockChallenge,
                    });
                    self.phase = Phase::RevealCard;
                } else {
                    self.log.record(format!(
                        "{} was bluffing the block! The challenge succeeds.",
                        self.players[block.blocker].name
                    ));
                    self.pending_reveal = Some(PendingReveal {
                        player: block.blocker,
                        reason: RevealReason::CaughtBluffingBlock,
                    });
                    self.phase = Phase::RevealCard;
                    // effects that need no further reveal land now; an
                    // attack stays pending and resumes after the reveal
                    if matches!(pending.kind, ActionKind::Thieve | ActionKind::Smuggle) {
                        self.resolve_action(pending);
                        self.pending_action = None;
                    }
                }
            }
        }
        true
    }

    fn reveal_card(&mut self, caller: PlayerId, card: Card) -> bool {
        if self.phase != Phase::RevealCard {
            return false;
        }
        let reveal = self
            .pending_reveal
            .expect("the reveal phase always names a player");
        if reveal.player != caller {
            return false;
        }
        let card = match self.players[caller].hand_mut().remove_first_where(|&c| c == card) {
            Some(card) => card,
            None => return false,
        };
        self.players[caller].revealed.push(card);
        let name = self.players[caller].name.clone();
        self.log.record(format!("{} reveals their {}.", name, card));
        self.pending_reveal = None;
        if self.players[caller].hand().is_empty() {
            self.players[caller].alive = false;
            self.log.record(format!("{} has been eliminated!", name));
            if let Some(winner) = self.sole_survivor() {
                self.pending_action = None;
                self.pending_block = None;
                self.exchange = None;
                self.reset_passed();
                self.phase = Phase::GameOver;
                self.log.record(format!(
                    "{} is the last one standing and wins the game!",
                    self.players[winner].name
                ));
                return true;
            }
        }
        let resumes = matches!(
            reveal.reason,
            RevealReason::FailedChallenge | RevealReason::CaughtBluffingBlock
        );
        match self.pending_action {
            Some(pending) if resumes => {
                self.log
                    .record(format!("The pending {} now proceeds.", pending.kind));
                self.pending_action = None;
                if self.resolve_action(pending) {
                    self.finish_turn();
                }
            }
            _ => self.finish_turn(),
        }
        true
    }

    fn return_exchange_cards(&mut self, caller: PlayerId, kept: Vec<Card>) -> bool {
        if self.phase != Phase::ExchangeCards {
            return false;
        }
        let info = self
            .exchange
            .expect("the exchange phase always has exchange info");
        if info.player != caller || kept.len() != info.keep {
            return false;
        }
        // the hand currently holds the old cards plus the 2 drawn ones; the
        // kept set must come out of exactly that pool
        let mut returned = self.players[caller].hand().clone();
        for card in &kept {
            if returned.remove_first_where(|c| c == card).is_none() {
                return false;
            }
        }
        *self.players[caller].hand_mut() = kept;
        for card in returned {
            self.deck.return_card(card);
        }
        self.log.record(format!(
            "{} completes their exchange.",
            self.players[caller].name
        ));
        self.exchange = None;
        self.finish_turn();
        true
    }

    /// Applies the resource/card effect of `pending`, assuming all gating
    /// (challenge and block sub-rounds) has already cleared. Returns `false`
    /// when the effect scheduled a forced reveal or an exchange instead of
    /// finishing the turn.
    fn resolve_action(&mut self, pending: PendingAction) -> bool {
        match pending.kind {
            ActionKind::Levy => {
                self.players[pending.actor].ducats += 3;
                self.log.record(format!(
                    "{} gains 3 ducats from the levy.",
                    self.players[pending.actor].name
                ));
                true
            }
            ActionKind::Smuggle => {
                self.players[pending.actor].ducats += 2;
                self.log.record(format!(
                    "{}'s smuggling succeeds. They gain 2 ducats.",
                    self.players[pending.actor].name
                ));
                true
            }
            ActionKind::Thieve => {
                let target = pending.target.expect("thieve always has a target");
                if self.players[target].alive {
                    let amount = self.steal(pending.actor, target);
                    self.log.record(format!(
                        "{} thieves {} ducats from {}.",
                        self.players[pending.actor].name, amount, self.players[target].name
                    ));
                }
                true
            }
            ActionKind::Attack => {
                let target = pending.target.expect("attack always has a target");
                if !self.players[target].alive {
                    // the target fell to an earlier reveal in this turn
                    return true;
                }
                self.log.record(format!(
                    "{} is attacked and must reveal a card.",
                    self.players[target].name
                ));
                self.pending_reveal = Some(PendingReveal {
                    player: target,
                    reason: RevealReason::Attacked,
                });
                self.phase = Phase::RevealCard;
                false
            }
            ActionKind::Exchange => {
                self.begin_exchange(pending.actor);
                false
            }
            ActionKind::Harvest | ActionKind::Overthrow => {
                unreachable!("resolved directly in the action phase")
            }
        }
    }

    fn begin_exchange(&mut self, actor: PlayerId) {
        let keep = self.players[actor].hand().len();
        for _ in 0..2 {
            let card = self.draw_or_die();
            self.players[actor].hand_mut().push(card);
        }
        self.exchange = Some(ExchangeInfo {
            player: actor,
            keep,
        });
        self.phase = Phase::ExchangeCards;
        self.log.record(format!(
            "{} draws 2 cards and chooses which to keep.",
            self.players[actor].name
        ));
    }

    fn steal(&mut self, actor: PlayerId, target: PlayerId) -> u32 {
        let amount = self.players[target].ducats.min(2);
        self.players[target].ducats -= amount;
        self.players[actor].ducats += amount;
        amount
    }

    /// The claimant shows the role card, shuffles it back into the deck and
    /// draws a replacement, so the shown card cannot be tracked.
    fn swap_shown_card(&mut self, player: PlayerId, role: Card) {
        let card = self.players[player]
            .hand_mut()
            .remove_first_where(|&c| c == role)
            .expect("the claimant was just checked to hold the role");
        let name = self.players[player].name.clone();
        self.log
            .record(format!("{} reveals a {}! The challenge fails.", name, role));
        self.deck.return_card(card);
        let replacement = self.draw_or_die();
        self.players[player].hand_mut().push(replacement);
        self.log.record(format!(
            "{} returns the card to the deck and draws a new one.",
            name
        ));
    }

    fn draw_or_die(&mut self) -> Card {
        match self.deck.draw() {
            Ok(card) => card,
            Err(_) => {
                log::error!("deck exhausted mid-game; card conservation is broken");
                panic!("deck exhausted");
            }
        }
    }

    fn sole_survivor(&self) -> Option<PlayerId> {
        self.living_players().single_element().copied()
    }

    /// Clears every pending structure and hands the turn to the next living
    /// seat.
    fn finish_turn(&mut self) {
        self.pending_action = None;
        self.pending_block = None;
        self.pending_reveal = None;
        self.exchange = None;
        self.reset_passed();
        self.phase = Phase::Action;
        self.advance_turn();
    }

    fn advance_turn(&mut self) {
        if self.players.iter().all(|p| !p.alive) {
            log::error!("turn advance with no living seat; win detection should have fired");
            panic!("no living player left");
        }
        self.turn = (self.turn + 1) % self.players.len();
        while !self.players[self.turn].alive {
            self.turn = (self.turn + 1) % self.players.len();
        }
        self.log.record(format!(
            "It is now {}'s turn.",
            self.players[self.turn].name
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{
        action::ActionKind,
        action_log::ActionLog,
        card::Card,
        deck::Deck,
        events::{BlockDecision, Intent, Response, SmuggleDecision},
        game_state::{GameState, Phase, RevealReason},
        player::Player,
    };

    fn rigged_state(hands: Vec<Vec<Card>>, deck: Vec<Card>) -> GameState {
        let players = hands
            .into_iter()
            .enumerate()
            .map(|(id, hand)| {
                let mut player = Player::new(id, format!("Player {}", id), hand);
                player.alive = !player.hand().is_empty();
                player
            })
            .collect();
        GameState {
            players,
            deck: Deck::from_cards(deck),
            turn: 0,
            phase: Phase::Action,
            pending_action: None,
            pending_block: None,
            pending_reveal: None,
            exchange: None,
            passed: HashSet::new(),
            log: ActionLog::default(),
        }
    }

    fn three_seats() -> GameState {
        rigged_state(
            vec![
                vec![Card::Thief, Card::Warrior],
                vec![Card::Defender, Card::Courtier],
                vec![Card::TaxCollector, Card::TaxCollector],
            ],
            vec![Card::Warrior, Card::Courtier, Card::Defender],
        )
    }

    fn act(action: ActionKind, target: Option<usize>) -> Intent {
        Intent::PerformAction { action, target }
    }

    fn pass() -> Intent {
        Intent::ChallengeResponse {
            response: Response::Pass,
        }
    }

    fn challenge() -> Intent {
        Intent::ChallengeResponse {
            response: Response::Challenge,
        }
    }

    #[test]
    fn harvest_should_pay_one_ducat_and_advance_the_turn() {
        let mut state = three_seats();

        assert!(state.handle_intent(0, act(ActionKind::Harvest, None)));

        assert_eq!(state.players[0].ducats, 3);
        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, Phase::Action);
    }

    #[test]
    fn actions_from_a_non_active_seat_should_leave_the_state_untouched() {
        let mut state = three_seats();
        let before = serde_json::to_string(&state).unwrap();

        assert!(!state.handle_intent(1, act(ActionKind::Harvest, None)));

        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn malformed_targets_should_be_silently_dropped() {
        let mut state = three_seats();

        assert!(!state.handle_intent(0, act(ActionKind::Harvest, Some(1))));
        assert!(!state.handle_intent(0, act(ActionKind::Thieve, None)));
        assert!(!state.handle_intent(0, act(ActionKind::Thieve, Some(0))));
        assert!(!state.handle_intent(0, act(ActionKind::Thieve, Some(9))));
        assert_eq!(state.phase, Phase::Action);
    }

    #[test]
    fn insufficient_funds_should_be_silently_ignored() {
        let mut state = three_seats();

        assert!(!state.handle_intent(0, act(ActionKind::Attack, Some(1))));
        assert!(!state.handle_intent(0, act(ActionKind::Overthrow, Some(1))));
        assert_eq!(state.players[0].ducats, 2);
        assert_eq!(state.phase, Phase::Action);
    }

    #[test]
    fn unchallenged_levy_should_grant_three_ducats_and_no_reveal() {
        let mut state = three_seats();

        assert!(state.handle_intent(0, act(ActionKind::Levy, None)));
        assert_eq!(state.phase, Phase::Challenge);
        assert!(state.handle_intent(1, pass()));
        assert!(state.handle_intent(2, pass()));

        assert_eq!(state.players[0].ducats, 5);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 1);
        assert_eq!(state.pending_reveal, None);
        assert_eq!(state.pending_action, None);
    }

    #[test]
    fn the_actor_should_not_be_able_to_respond_to_their_own_claim() {
        let mut state = three_seats();
        state.handle_intent(0, act(ActionKind::Levy, None));

        assert!(!state.handle_intent(0, pass()));
        assert!(!state.handle_intent(0, challenge()));
    }

    #[test]
    fn a_duplicate_pass_should_be_a_no_op() {
        let mut state = three_seats();
        state.handle_intent(0, act(ActionKind::Levy, None));
        assert!(state.handle_intent(1, pass()));
        let before = serde_json::to_string(&state).unwrap();

        assert!(!state.handle_intent(1, pass()));

        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn a_seat_that_passed_should_not_challenge_afterwards() {
        let mut state = three_seats();
        state.handle_intent(0, act(ActionKind::Levy, None));
        state.handle_intent(1, pass());

        assert!(!state.handle_intent(1, challenge()));
        assert_eq!(state.phase, Phase::Challenge);
    }

    #[test]
    fn failed_challenge_should_swap_the_shown_card_and_resume_the_thieve() {
        let mut state = three_seats();
        let total = state.total_cards();

        assert!(state.handle_intent(0, act(ActionKind::Thieve, Some(1))));
        assert!(state.handle_intent(1, challenge()));

        assert_eq!(
            state.pending_reveal,
            Some(crate::game_state::PendingReveal {
                player: 1,
                reason: RevealReason::FailedChallenge,
            })
        );
        assert_eq!(state.phase, Phase::RevealCard);
        assert_eq!(state.players[0].hand().len(), 2);

        assert!(state.handle_intent(1, Intent::RevealCard { card: Card::Defender }));

        // the thieve resolves without a second challenge round
        assert_eq!(state.players[0].ducats, 4);
        assert_eq!(state.players[1].ducats, 0);
        assert_eq!(state.players[1].revealed, vec![Card::Defender]);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 1);
        assert_eq!(state.total_cards(), total);
    }

    #[test]
    fn caught_bluffing_attack_should_refund_the_cost_and_never_touch_the_target() {
        let mut state = three_seats();
        state.players[0].ducats = 3;
        *state.players[0].hand_mut() = vec![Card::Thief, Card::Courtier];

        assert!(state.handle_intent(0, act(ActionKind::Attack, Some(1))));
        assert_eq!(state.players[0].ducats, 0);
        assert!(state.handle_intent(2, challenge()));

        assert_eq!(state.players[0].ducats, 3);
        assert_eq!(
            state.pending_reveal,
            Some(crate::game_state::PendingReveal {
                player: 0,
                reason: RevealReason::CaughtBluffing,
            })
        );
        assert_eq!(state.pending_action, None);

        assert!(state.handle_intent(0, Intent::RevealCard { card: Card::Thief }));

        assert_eq!(state.players[0].ducats, 3);
        assert_eq!(state.players[1].hand().len(), 2);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn blocked_and_unchallenged_thieve_should_never_transfer() {
        let mut state = three_seats();
        state.handle_intent(0, act(ActionKind::Thieve, Some(1)));
        state.handle_intent(1, pass());
        state.handle_intent(2, pass());
        assert_eq!(state.phase, Phase::DeclareBlock);

        assert!(state.handle_intent(
            1,
            Intent::DeclareBlock {
                block: BlockDecision::Claim(Card::Courtier),
            }
        ));
        assert_eq!(state.phase, Phase::BlockChallenge);
        assert!(state.handle_intent(
            0,
            Intent::BlockResponse {
                response: Response::Pass,
            }
        ));
        assert!(state.handle_intent(
            2,
            Intent::BlockResponse {
                response: Response::Pass,
            }
        ));

        assert_eq!(state.players[0].ducats, 2);
        assert_eq!(state.players[1].ducats, 2);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn a_block_role_outside_the_counter_table_should_be_rejected() {
        let mut state = three_seats();
        state.handle_intent(0, act(ActionKind::Thieve, Some(1)));
        state.handle_intent(1, pass());
        state.handle_intent(2, pass());

        assert!(!state.handle_intent(
            1,
            Intent::DeclareBlock {
                block: BlockDecision::Claim(Card::Defender),
            }
        ));
        assert_eq!(state.phase, Phase::DeclareBlock);
    }

    #[test]
    fn only_the_target_should_answer_the_block_declaration() {
        let mut state = three_seats();
        state.handle_intent(0, act(ActionKind::Thieve, Some(1)));
        state.handle_intent(1, pass());
        state.handle_intent(2, pass());

        assert!(!state.handle_intent(
            2,
            Intent::DeclareBlock {
                block: BlockDecision::NoBlock,
            }
        ));
    }

    #[test]
    fn a_bluffed_block_should_resolve_the_thieve_and_punish_the_blocker() {
        let mut state = three_seats();
        *state.players[1].hand_mut() = vec![Card::Defender, Card::Warrior];
        state.handle_intent(0, act(ActionKind::Thieve, Some(1)));
        state.handle_intent(1, pass());
        state.handle_intent(2, pass());
        state.handle_intent(
            1,
            Intent::DeclareBlock {
                block: BlockDecision::Claim(Card::Thief),
            },
        );

        assert!(state.handle_intent(
            2,
            Intent::BlockResponse {
                response: Response::Challenge,
            }
        ));

        // the steal lands immediately, the bluffing blocker still reveals
        assert_eq!(state.players[0].ducats, 4);
        assert_eq!(state.players[1].ducats, 0);
        assert_eq!(
            state.pending_reveal,
            Some(crate::game_state::PendingReveal {
                player: 1,
                reason: RevealReason::CaughtBluffingBlock,
            })
        );

        assert!(state.handle_intent(1, Intent::RevealCard { card: Card::Warrior }));

        assert_eq!(state.players[0].ducats, 4);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn an_honest_block_should_cancel_the_smuggle_and_punish_the_challenger() {
        let mut state = three_seats();
        let total = state.total_cards();

        assert!(state.handle_intent(0, act(ActionKind::Smuggle, None)));
        assert_eq!(state.phase, Phase::BlockDeclarationPeriod);
        assert!(state.handle_intent(
            2,
            Intent::SmuggleResponse {
                response: SmuggleDecision::Block,
            }
        ));
        assert_eq!(state.phase, Phase::BlockChallenge);

        assert!(state.handle_intent(
            0,
            Intent::BlockResponse {
                response: Response::Challenge,
            }
        ));

        assert_eq!(
            state.pending_reveal,
            Some(crate::game_state::PendingReveal {
                player: 0,
                reason: RevealReason::FailedBlockChallenge,
            })
        );
        assert!(state.handle_intent(0, Intent::RevealCard { card: Card::Thief }));

        assert_eq!(state.players[0].ducats, 2);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 1);
        assert_eq!(state.total_cards(), total);
    }

    #[test]
    fn unblocked_smuggling_should_grant_two_ducats() {
        let mut state = three_seats();
        state.handle_intent(0, act(ActionKind::Smuggle, None));

        assert!(state.handle_intent(
            1,
            Intent::SmuggleResponse {
                response: SmuggleDecision::Pass,
            }
        ));
        assert!(state.handle_intent(
            2,
            Intent::SmuggleResponse {
                response: SmuggleDecision::Pass,
            }
        ));

        assert_eq!(state.players[0].ducats, 4);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn overthrow_should_force_a_reveal_and_win_detection_should_fire_at_once() {
        let mut state = rigged_state(
            vec![vec![Card::Thief, Card::Thief], vec![Card::Warrior]],
            vec![Card::Courtier],
        );
        state.players[0].ducats = 7;

        assert!(state.handle_intent(0, act(ActionKind::Overthrow, Some(1))));
        assert_eq!(state.players[0].ducats, 0);
        assert_eq!(state.phase, Phase::RevealCard);

        assert!(state.handle_intent(1, Intent::RevealCard { card: Card::Warrior }));

        assert!(!state.players[1].alive);
        assert_eq!(state.phase, Phase::GameOver);
        // terminal: nothing is accepted any more
        assert!(!state.handle_intent(0, act(ActionKind::Harvest, None)));
    }

    #[test]
    fn unblocked_attack_should_cost_three_and_force_one_reveal() {
        let mut state = three_seats();
        state.players[0].ducats = 3;
        state.handle_intent(0, act(ActionKind::Attack, Some(1)));
        state.handle_intent(1, pass());
        state.handle_intent(2, pass());
        assert_eq!(state.phase, Phase::DeclareBlock);

        assert!(state.handle_intent(
            1,
            Intent::DeclareBlock {
                block: BlockDecision::NoBlock,
            }
        ));

        assert_eq!(state.players[0].ducats, 0);
        assert_eq!(state.phase, Phase::RevealCard);
        assert!(state.handle_intent(1, Intent::RevealCard { card: Card::Courtier }));
        assert_eq!(state.players[0].ducats, 0);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn a_failed_challenge_on_an_attack_should_chain_two_reveals() {
        let mut state = three_seats();
        state.players[0].ducats = 3;

        assert!(state.handle_intent(0, act(ActionKind::Attack, Some(1))));
        assert!(state.handle_intent(1, challenge()));
        assert_eq!(state.phase, Phase::RevealCard);

        assert!(state.handle_intent(1, Intent::RevealCard { card: Card::Defender }));

        // the attack now proceeds against the same seat
        assert_eq!(state.phase, Phase::RevealCard);
        assert_eq!(
            state.pending_reveal,
            Some(crate::game_state::PendingReveal {
                player: 1,
                reason: RevealReason::Attacked,
            })
        );

        assert!(state.handle_intent(1, Intent::RevealCard { card: Card::Courtier }));

        assert!(!state.players[1].alive);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 2);
    }

    #[test]
    fn turn_rotation_should_skip_eliminated_seats() {
        let mut state = rigged_state(
            vec![
                vec![Card::Thief, Card::Warrior],
                vec![],
                vec![Card::Courtier, Card::Defender],
            ],
            vec![],
        );

        assert!(state.handle_intent(0, act(ActionKind::Harvest, None)));

        assert_eq!(state.turn, 2);
    }

    #[test]
    fn exchange_should_swap_cards_through_the_deck() {
        let mut state = rigged_state(
            vec![
                vec![Card::Thief, Card::Warrior],
                vec![Card::Defender, Card::Defender],
            ],
            vec![Card::TaxCollector, Card::Defender, Card::Courtier],
        );
        let total = state.total_cards();

        assert!(state.handle_intent(0, act(ActionKind::Exchange, None)));
        assert!(state.handle_intent(1, pass()));

        assert_eq!(state.phase, Phase::ExchangeCards);
        assert_eq!(state.players[0].hand().len(), 4);

        // the kept set must be the right size and come out of the offer
        assert!(!state.handle_intent(
            0,
            Intent::ReturnExchangeCards { kept: vec![Card::Thief] }
        ));
        assert!(!state.handle_intent(
            0,
            Intent::ReturnExchangeCards {
                kept: vec![Card::TaxCollector, Card::Thief],
            }
        ));
        assert!(state.handle_intent(
            0,
            Intent::ReturnExchangeCards {
                kept: vec![Card::Thief, Card::Courtier],
            }
        ));

        assert_eq!(state.players[0].hand(), &vec![Card::Thief, Card::Courtier]);
        assert_eq!(state.total_cards(), total);
        assert_eq!(state.phase, Phase::Action);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn a_proven_courtier_should_still_get_their_exchange_after_the_reveal() {
        let mut state = rigged_state(
            vec![
                vec![Card::Courtier, Card::Warrior],
                vec![Card::Defender, Card::Thief],
            ],
            vec![Card::TaxCollector, Card::Defender, Card::Courtier],
        );

        assert!(state.handle_intent(0, act(ActionKind::Exchange, None)));
        assert!(state.handle_intent(1, challenge()));
        assert!(state.handle_intent(1, Intent::RevealCard { card: Card::Thief }));

        assert_eq!(state.phase, Phase::ExchangeCards);
        assert_eq!(state.exchange.map(|e| e.player), Some(0));
        assert_eq!(state.players[0].hand().len(), 4);
    }

    #[test]
    fn revealing_a_card_not_in_hand_should_be_rejected() {
        let mut state = rigged_state(
            vec![vec![Card::Thief, Card::Thief], vec![Card::Warrior, Card::Warrior]],
            vec![Card::Courtier],
        );
        state.players[0].ducats = 7;
        state.handle_intent(0, act(ActionKind::Overthrow, Some(1)));

        assert!(!state.handle_intent(1, Intent::RevealCard { card: Card::TaxCollector }));
        assert!(!state.handle_intent(0, Intent::RevealCard { card: Card::Thief }));
        assert_eq!(state.phase, Phase::RevealCard);
    }

    #[test]
    fn card_conservation_should_hold_across_full_turns() {
        let mut state = GameState::new(vec![
            "Foo".to_string(),
            "Bar".to_string(),
            "Baz".to_string(),
            "Qux".to_string(),
        ]);

        for _ in 0..4 {
            let actor = state.turn;
            assert!(state.handle_intent(actor, act(ActionKind::Harvest, None)));
            assert_eq!(state.total_cards(), 15);
        }

        let actor = state.turn;
        assert!(state.handle_intent(actor, act(ActionKind::Levy, None)));
        for seat in 0..4 {
            if seat != actor {
                state.handle_intent(seat, pass());
            }
        }
        assert_eq!(state.players[actor].ducats, 6);
        assert_eq!(state.total_cards(), 15);
    }
}
