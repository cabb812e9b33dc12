//! Narrow callback seam between automata and graphical exporters. The automaton walks its
//! states and transitions once through a [`Canvas`]; implementations decide on the output
//! format. [`DotCanvas`] renders Graphviz dot text and is what the crate's own tooling
//! uses.

use std::fmt::Write as _;

/// Receiver of one automaton drawing pass, called in the order `begin`, every `node`,
/// every `edge`, `end`.
pub trait Canvas {
    /// Opens a drawing surface of the given extent. Coordinates passed to
    /// [`Self::node`] fall within it; renderers with their own layout may ignore all
    /// three.
    fn begin(&mut self, width: i32, height: i32);
    /// Places one state. `initial` and `is_final` carry the state's flags.
    fn node(&mut self, name: &str, x: i32, y: i32, initial: bool, is_final: bool);
    /// Draws one labelled transition between two previously placed nodes.
    fn edge(&mut self, from: &str, to: &str, label: &str);
    /// Closes the drawing surface.
    fn end(&mut self);
}

/// [`Canvas`] rendering Graphviz dot text. Final states become double circles, initial
/// states get an arrow from an invisible source node. The grid coordinates are dropped and
/// layout is left to dot.
///
/// # Example
/// ```
/// use icdfa::prelude::*;
/// let mut gen = RandomDfaGenerator::new(3, Alphabet::of_size(2)).with_seed(2);
/// let mut canvas = DotCanvas::default();
/// gen.random().unwrap().draw(&mut canvas);
/// assert!(canvas.rendered().starts_with("digraph automaton {"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DotCanvas {
    out: String,
}

impl DotCanvas {
    /// The dot document built so far; complete after [`Canvas::end`] was called.
    pub fn rendered(&self) -> &str {
        &self.out
    }

    /// Takes the dot document out, leaving the canvas ready for another drawing pass.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}

impl Canvas for DotCanvas {
    fn begin(&mut self, _width: i32, _height: i32) {
        self.out.clear();
        self.out.push_str("digraph automaton {\n  rankdir = LR;\n");
    }

    fn node(&mut self, name: &str, _x: i32, _y: i32, initial: bool, is_final: bool) {
        let shape = if is_final { "doublecircle" } else { "circle" };
        let _ = writeln!(self.out, "  \"{name}\" [shape = {shape}];");
        if initial {
            let _ = writeln!(self.out, "  \"__start_{name}\" [shape = none, label = \"\"];");
            let _ = writeln!(self.out, "  \"__start_{name}\" -> \"{name}\";");
        }
    }

    fn edge(&mut self, from: &str, to: &str, label: &str) {
        let _ = writeln!(self.out, "  \"{from}\" -> \"{to}\" [label = \"{label}\"];");
    }

    fn end(&mut self) {
        self.out.push_str("}\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn dot_output_lists_every_state_and_transition() {
        let mut a = DenseAutomaton::<usize, char>::with_states(2, Alphabet::of_size(1));
        a.set_initial_index(0, true);
        a.set_final_index(1, true);
        a.connect(0, 1, 'a');
        a.connect(1, 1, 'a');
        let mut canvas = DotCanvas::default();
        a.draw(&mut canvas);
        let dot = canvas.take();
        assert!(dot.contains("\"0\" [shape = circle]"));
        assert!(dot.contains("\"1\" [shape = doublecircle]"));
        assert!(dot.contains("\"__start_0\" -> \"0\""));
        assert!(dot.contains("\"0\" -> \"1\" [label = \"a\"]"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn undefined_transitions_are_not_drawn() {
        let mut a = DenseAutomaton::<usize, char>::with_states(2, Alphabet::of_size(2));
        a.set_initial_index(0, true);
        a.connect(0, 1, 'a');
        let mut canvas = DotCanvas::default();
        a.draw(&mut canvas);
        let dot = canvas.take();
        assert_eq!(dot.matches("->").count(), 2, "one start arrow and one transition");
    }
}
