//! Monte Carlo Tree Search with random playouts
//!
//! Each decision builds a fresh tree rooted at the current position. An
//! iteration selects a leaf by UCB1, expands one untried move, plays random
//! moves to the end of the game and records the result on the path back to
//! the root. The move finally played is the most visited child of the root.

use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, Rng};

use crate::board::{Board, Piece};
use crate::engine::{opening_move, seeded_rng, Engine};
use crate::opening_book::{OpeningBook, DEFAULT_BOOK_PLIES};

/// Index of a node in a [`Tree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node is always at index 0
    pub const ROOT: NodeId = NodeId(0);
}

/// A position in the search tree and the playout statistics gathered below it
#[derive(Clone, Debug)]
pub struct Node {
    /// The position after `column` was played
    pub board: Board,
    /// The piece to move in `board`
    pub to_move: Piece,
    pub parent: Option<NodeId>,
    /// The column played to reach this node, `None` for the root
    pub column: Option<usize>,
    pub visits: u32,
    /// Playouts through this node won by the searching piece
    pub wins: u32,
    /// Legal columns not yet expanded, empty once the game is over
    pub untried: Vec<usize>,
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(board: Board, to_move: Piece, parent: Option<NodeId>, column: Option<usize>) -> Self {
        let untried = if board.is_terminal() {
            Vec::new()
        } else {
            board.legal_moves()
        };
        Self {
            board,
            to_move,
            parent,
            column,
            visits: 0,
            wins: 0,
            untried,
            children: Vec::new(),
        }
    }

    /// Fraction of playouts through this node won by the searching piece
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f64 / self.visits as f64
        }
    }
}

/// Arena-allocated search tree
///
/// Nodes are stored in a vector and refer to their parent and children by
/// index, so the tree is dropped in one go once a move is chosen.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new(root: Node) -> Self {
        Self { nodes: vec![root] }
    }

    /// # Panics
    /// Panics if the `NodeId` is from another tree.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn root(&self) -> &Node {
        self.get(NodeId::ROOT)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.get(id).children.iter().map(move |&child| self.get(child))
    }

    /// The most visited child of the root
    pub fn best_child(&self) -> Option<&Node> {
        self.children(NodeId::ROOT).max_by_key(|node| node.visits)
    }
}

/// Settings for an [`Mcts`] agent
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Select-expand-simulate-backpropagate rounds per decision
    pub iterations: usize,
    /// The constant `c` in the UCB1 term `sqrt(c * ln(parent visits) / visits)`
    pub exploration: f64,
    /// Score children at nodes where the opponent chooses by the opponent's
    /// win rate `1 - wins / visits` rather than the searching piece's
    pub opponent_perspective: bool,
    /// The opening book is consulted while at most this many moves have been played
    pub book_plies: usize,
    pub seed: Option<u64>,
}

impl MctsConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_opponent_perspective(mut self, opponent_perspective: bool) -> Self {
        self.opponent_perspective = opponent_perspective;
        self
    }

    pub fn with_book_plies(mut self, book_plies: usize) -> Self {
        self.book_plies = book_plies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            exploration: 2.0,
            opponent_perspective: false,
            book_plies: DEFAULT_BOOK_PLIES,
            seed: None,
        }
    }
}

/// An agent choosing moves by Monte Carlo Tree Search
pub struct Mcts {
    piece: Piece,
    config: MctsConfig,
    opening_book: Option<OpeningBook>,
    rng: StdRng,
}

impl Mcts {
    /// Creates a new `Mcts` agent playing `piece`
    pub fn new(piece: Piece, config: MctsConfig) -> Self {
        Self {
            piece,
            rng: seeded_rng(config.seed),
            config,
            opening_book: None,
        }
    }

    /// Adds an opening book to an existing `Mcts`
    pub fn with_opening_book(mut self, opening_book: OpeningBook) -> Self {
        self.opening_book = Some(opening_book);
        self
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Runs the configured number of iterations from `board` with the agent to move
    pub fn build_tree(&mut self, board: &Board) -> Tree {
        let mut tree = Tree::new(Node::new(board.clone(), self.piece, None, None));
        for _ in 0..self.config.iterations {
            self.iterate(&mut tree);
        }
        tree
    }

    fn iterate(&mut self, tree: &mut Tree) {
        // select
        let mut id = NodeId::ROOT;
        while tree.get(id).untried.is_empty() && !tree.get(id).children.is_empty() {
            id = self.select_child(tree, id);
        }

        // expand
        if !tree.get(id).untried.is_empty() {
            id = self.expand(tree, id);
        }

        // simulate
        let result = match self.simulate(tree.get(id)) {
            Some(winner) if winner == self.piece => 1,
            _ => 0,
        };

        // backpropagate
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = tree.get_mut(node_id);
            node.visits += 1;
            node.wins += result;
            current = node.parent;
        }
    }

    /// The child of `id` with the highest UCB1 value
    /// `wins / visits + sqrt(c * ln(parent visits) / visits)`
    pub(crate) fn select_child(&self, tree: &Tree, id: NodeId) -> NodeId {
        let parent = tree.get(id);
        let log_visits = (parent.visits as f64).ln();
        let flip = self.config.opponent_perspective && parent.to_move != self.piece;

        let ucb = |child: &Node| {
            // children are visited as soon as they are created
            let visits = child.visits.max(1) as f64;
            let win_rate = child.win_rate();
            let exploitation = if flip { 1.0 - win_rate } else { win_rate };
            exploitation + (self.config.exploration * log_visits / visits).sqrt()
        };

        parent
            .children
            .iter()
            .copied()
            .max_by(|&a, &b| ucb(tree.get(a)).total_cmp(&ucb(tree.get(b))))
            .unwrap_or(id)
    }

    /// Adds a child of `id` for one of its untried columns, chosen at random
    fn expand(&mut self, tree: &mut Tree, id: NodeId) -> NodeId {
        let node = tree.get_mut(id);
        let index = self.rng.gen_range(0..node.untried.len());
        let column = node.untried.swap_remove(index);

        let mut board = node.board.clone();
        let to_move = node.to_move;
        board
            .drop(column, to_move)
            .expect("untried column was not playable");

        let child = tree.add(Node::new(board, to_move.opponent(), Some(id), Some(column)));
        tree.get_mut(id).children.push(child);
        child
    }

    /// Plays random moves from `node` to the end of the game, returning the winner
    fn simulate(&mut self, node: &Node) -> Option<Piece> {
        let mut board = node.board.clone();
        let mut piece = node.to_move;

        if let Some(winner) = board.winner() {
            return Some(winner);
        }
        loop {
            let column = *board.legal_moves().choose(&mut self.rng)?;
            board
                .drop(column, piece)
                .expect("random playout chose a full column");
            if board.check_winner(piece) {
                return Some(piece);
            }
            piece = piece.opponent();
        }
    }
}

impl Engine for Mcts {
    fn name(&self) -> &str {
        "mcts"
    }

    fn piece(&self) -> Piece {
        self.piece
    }

    fn get_move(&mut self, board: &Board, history: &str) -> Option<usize> {
        let legal_moves = board.legal_moves();
        if legal_moves.is_empty() {
            return None;
        }
        if let Some(column) = opening_move(
            board,
            history,
            self.opening_book.as_ref(),
            self.config.book_plies,
        ) {
            return Some(column);
        }

        let tree = self.build_tree(board);
        for child in tree.children(NodeId::ROOT) {
            debug!(
                "column {}: {} wins / {} visits",
                child.column.map_or(0, |column| column + 1),
                child.wins,
                child.visits
            );
        }
        match tree.best_child().and_then(|child| child.column) {
            Some(column) => Some(column),
            // no iterations were run
            None => legal_moves.choose(&mut self.rng).copied(),
        }
    }
}
