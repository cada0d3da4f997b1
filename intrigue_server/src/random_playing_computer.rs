use intrigue_core::{
    action::ActionKind,
    events::{BlockDecision, Intent, Response, SmuggleDecision},
    game_state::{GameState, Phase},
    player::PlayerId,
};
use rand::{seq::SliceRandom, Rng};

pub struct RandomPlayingComputer {
    pub seat: PlayerId,
}

impl RandomPlayingComputer {
    pub fn new(seat: PlayerId) -> Self {
        RandomPlayingComputer { seat }
    }

    /// Derives one plausible intent from the current snapshot, or `None`
    /// when this seat has nothing to respond to.
    pub fn obtain_intent(&self, state: &GameState) -> Option<Intent> {
        let me = &state.players[self.seat];
        match state.phase {
            Phase::Action => {
                if state.turn != self.seat {
                    return None;
                }
                Some(self.choose_action(state))
            }
            Phase::Challenge => {
                let pending = state.pending_action?;
                if !me.alive || self.seat == pending.actor || state.has_passed(self.seat) {
                    return None;
                }
                Some(Intent::ChallengeResponse {
                    response: maybe_challenge(),
                })
            }
            Phase::DeclareBlock => {
                let pending = state.pending_action?;
                if pending.target != Some(self.seat) {
                    return None;
                }
                let mut rng = rand::thread_rng();
                let block = if rng.gen_bool(0.25) {
                    BlockDecision::Claim(
                        *pending
                            .kind
                            .blocked_by()
                            .choose(&mut rng)
                            .expect("blockable kinds have counter-roles"),
                    )
                } else {
                    BlockDecision::NoBlock
                };
                Some(Intent::DeclareBlock { block })
            }
            Phase::BlockDeclarationPeriod => {
                let pending = state.pending_action?;
                if !me.alive || self.seat == pending.actor || state.has_passed(self.seat) {
                    return None;
                }
                let response = if rand::thread_rng().gen_bool(0.15) {
                    SmuggleDecision::Block
                } else {
                    SmuggleDecision::Pass
                };
                Some(Intent::SmuggleResponse { response })
            }
            Phase::BlockChallenge => {
                let block = state.pending_block?;
                if !me.alive || self.seat == block.blocker || state.has_passed(self.seat) {
                    return None;
                }
                Some(Intent::BlockResponse {
                    response: maybe_challenge(),
                })
            }
            Phase::RevealCard => {
                let reveal = state.pending_reveal?;
                if reveal.player != self.seat {
                    return None;
                }
                me.hand().first().map(|&card| Intent::RevealCard { card })
            }
            Phase::ExchangeCards => {
                let info = state.exchange?;
                if info.player != self.seat {
                    return None;
                }
                let kept = me.hand().iter().copied().take(info.keep).collect();
                Some(Intent::ReturnExchangeCards { kept })
            }
            Phase::GameOver => None,
        }
    }

    fn choose_action(&self, state: &GameState) -> Intent {
        let mut rng = rand::thread_rng();
        let me = &state.players[self.seat];
        let others: Vec<PlayerId> = state
            .living_players()
            .into_iter()
            .filter(|&id| id != self.seat)
            .collect();
        let target = *others.choose(&mut rng).expect("a running game has opponents");
        if me.ducats >= 7 {
            return Intent::PerformAction {
                action: ActionKind::Overthrow,
                target: Some(target),
            };
        }
        let mut options = vec![
            ActionKind::Harvest,
            ActionKind::Levy,
            ActionKind::Smuggle,
            ActionKind::Thieve,
            ActionKind::Exchange,
        ];
        if me.ducats >= 3 {
            options.push(ActionKind::Attack);
        }
        let action = *options.choose(&mut rng).expect("options is never empty");
        let target = action.needs_target().then_some(target);
        Intent::PerformAction { action, target }
    }
}

fn maybe_challenge() -> Response {
    if rand::thread_rng().gen_bool(0.2) {
        Response::Challenge
    } else {
        Response::Pass
    }
}
