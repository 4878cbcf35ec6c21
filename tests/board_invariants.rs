//! Randomized board invariants: apply/undo symmetry, blocked-cell
//! permanence and terminal detection over full random playouts.

use mnk::board::{Board, Cell, Move, Player, TerminalStatus};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_move(board: &Board, rng: &mut StdRng) -> Option<Move> {
    let moves: Vec<Move> = board.empty_positions().collect();
    if moves.is_empty() {
        None
    } else {
        Some(moves[rng.random_range(0..moves.len())])
    }
}

#[test]
fn test_apply_undo_restores_board_throughout_random_playouts() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let mut board = Board::new(4, 3, &[(1, 2)]).unwrap();
        while !board.terminal_status().is_over() {
            let snapshot = board.clone();
            // probe every legal move before committing to one
            for mv in snapshot.empty_positions() {
                board.apply(mv, board.to_move());
                board.undo(mv);
                assert_eq!(board, snapshot);
            }
            let mv = random_move(&board, &mut rng).unwrap();
            let mover = board.to_move();
            board.apply(mv, mover);
            board.switch_player();
        }
    }
}

#[test]
fn test_playouts_end_in_win_or_draw_with_consistent_counts() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let mut board = Board::new(5, 4, &[(0, 0), (4, 4)]).unwrap();
        let capacity = board.empty_count();
        let mut played = 0;

        let status = loop {
            let status = board.terminal_status();
            if status.is_over() {
                break status;
            }
            let mv = random_move(&board, &mut rng).unwrap();
            let mover = board.to_move();
            board.apply(mv, mover);
            board.switch_player();
            played += 1;
        };

        assert_eq!(board.empty_count(), capacity - played);
        match status {
            TerminalStatus::Draw => assert_eq!(board.empty_count(), 0),
            TerminalStatus::XWins | TerminalStatus::OWins => {
                assert!(status.winner().is_some())
            }
            TerminalStatus::Ongoing => unreachable!(),
        }
    }
}

#[test]
fn test_blocked_cells_never_change() {
    let blocked = [(0, 3), (2, 2)];
    let mut rng = StdRng::seed_from_u64(3);
    let mut board = Board::new(4, 3, &blocked).unwrap();
    while !board.terminal_status().is_over() {
        let mv = random_move(&board, &mut rng).unwrap();
        let mover = board.to_move();
        board.apply(mv, mover);
        board.switch_player();
        for &(row, col) in &blocked {
            assert_eq!(board.cell(row, col), Cell::Blocked);
        }
    }
}

#[test]
fn test_winner_needs_exactly_the_configured_run() {
    // s - 1 in a row is never terminal, s in a row always is
    for s in 2..=4 {
        let mut board = Board::new(4, s, &[]).unwrap();
        for col in 0..s - 1 {
            board.apply(Move::new(0, col), Player::O);
        }
        assert_eq!(board.terminal_status(), TerminalStatus::Ongoing);
        board.apply(Move::new(0, s - 1), Player::O);
        assert_eq!(board.terminal_status(), TerminalStatus::OWins);
    }
}
