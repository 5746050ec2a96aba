//! Decomposing must never change what a program does.
//!
//! Random scripts made of calls that log themselves and mutate a global are run through a tiny
//! evaluator before and after a call site is exposed (and optionally relocated).
//! The call log and every user variable must come out the same.

use super::test_support::{Harness, parse};
use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{BinaryOperator, NodeId, NodeKind};
use crate::compiler_frontend::optimizers::expression_decomposer::DecompositionType;
use proptest::prelude::*;
use rustc_hash::FxHashMap;

const FUNCTION_COUNT: u32 = 4;
const USER_VARIABLES: [&str; 3] = ["x", "y", "g"];

#[derive(Debug, Clone)]
enum Expr {
    Number(u8),
    Read(&'static str),
    Call(u32, Vec<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Hook(Box<Expr>, Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Assign(&'static str, Box<Expr>),
    AddAssign(&'static str, Box<Expr>),
}

impl Expr {
    // Fully parenthesised, so precedence never matters
    fn render(&self) -> String {
        match self {
            Expr::Number(value) => value.to_string(),
            Expr::Read(name) => String::from(*name),
            Expr::Call(function, args) => {
                let args = args.iter().map(Expr::render).collect::<Vec<_>>();
                format!("f{function}({})", args.join(", "))
            }
            Expr::Add(left, right) => format!("({} + {})", left.render(), right.render()),
            Expr::Hook(condition, then_value, else_value) => format!(
                "({} ? {} : {})",
                condition.render(),
                then_value.render(),
                else_value.render()
            ),
            Expr::And(left, right) => format!("({} && {})", left.render(), right.render()),
            Expr::Or(left, right) => format!("({} || {})", left.render(), right.render()),
            Expr::Assign(name, value) => format!("({name} = {})", value.render()),
            Expr::AddAssign(name, value) => format!("({name} += {})", value.render()),
        }
    }
}

fn expression() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (0u8..3).prop_map(Expr::Number),
        prop::sample::select(USER_VARIABLES.to_vec()).prop_map(Expr::Read),
        (0..FUNCTION_COUNT).prop_map(|function| Expr::Call(function, Vec::new())),
    ];

    leaf.prop_recursive(4, 32, 3, |inner| {
        let assignable = prop::sample::select(vec!["x", "y"]);
        prop_oneof![
            (0..FUNCTION_COUNT, prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(function, args)| Expr::Call(function, args)),
            (inner.clone(), inner.clone())
                .prop_map(|(left, right)| Expr::Add(Box::new(left), Box::new(right))),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(c, t, e)| Expr::Hook(
                Box::new(c),
                Box::new(t),
                Box::new(e)
            )),
            (inner.clone(), inner.clone())
                .prop_map(|(left, right)| Expr::And(Box::new(left), Box::new(right))),
            (inner.clone(), inner.clone())
                .prop_map(|(left, right)| Expr::Or(Box::new(left), Box::new(right))),
            (assignable.clone(), inner.clone())
                .prop_map(|(name, value)| Expr::Assign(name, Box::new(value))),
            (assignable, inner).prop_map(|(name, value)| Expr::AddAssign(name, Box::new(value))),
        ]
    })
}

fn script() -> impl Strategy<Value = String> {
    let statement = (prop::option::of(prop::sample::select(vec!["x", "y"])), expression())
        .prop_map(|(target, value)| match target {
            Some(target) => format!("{target} = {};", value.render()),
            None => format!("{};", value.render()),
        });

    prop::collection::vec(statement, 1..4).prop_map(|statements| statements.join("\n"))
}

// ============================================================
// Reference evaluator
// ============================================================
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Number(f64),
    Function(u32),
}

impl Value {
    fn is_truthy(self) -> bool {
        match self {
            Value::Number(value) => value != 0.0,
            Value::Function(_) => true,
        }
    }

    fn number(self) -> f64 {
        match self {
            Value::Number(value) => value,
            Value::Function(function) => panic!("f{function} used as a number"),
        }
    }
}

#[derive(Debug, PartialEq)]
struct Outcome {
    calls: Vec<u32>,
    variables: Vec<(String, Value)>,
}

struct Evaluator<'a> {
    ast: &'a Ast,
    variables: FxHashMap<String, Value>,
    calls: Vec<u32>,
}

impl<'a> Evaluator<'a> {
    fn run(ast: &'a Ast) -> Outcome {
        let mut variables = FxHashMap::default();
        for name in USER_VARIABLES {
            variables.insert(String::from(name), Value::Number(0.0));
        }
        for function in 0..FUNCTION_COUNT {
            variables.insert(format!("f{function}"), Value::Function(function));
        }

        let mut evaluator = Evaluator {
            ast,
            variables,
            calls: Vec::new(),
        };
        evaluator.statement(ast.root);

        let variables = USER_VARIABLES
            .iter()
            .map(|name| (String::from(*name), evaluator.read(name)))
            .collect();

        Outcome {
            calls: evaluator.calls,
            variables,
        }
    }

    fn read(&self, name: &str) -> Value {
        self.variables
            .get(name)
            .copied()
            .unwrap_or(Value::Number(0.0))
    }

    fn statement(&mut self, id: NodeId) {
        let ast = self.ast;
        let children = ast.children(id);

        match ast.kind(id) {
            NodeKind::Script | NodeKind::Block => {
                for child in children {
                    self.statement(*child);
                }
            }
            NodeKind::ExprResult => {
                self.expression(children[0]);
            }
            NodeKind::Var => {
                for declarator in children {
                    let value = match ast.first_child(*declarator) {
                        Some(initializer) => self.expression(initializer),
                        None => Value::Number(0.0),
                    };
                    let name = ast.name_of(*declarator).expect("declarator name");
                    self.variables.insert(String::from(name), value);
                }
            }
            NodeKind::If => {
                if self.expression(children[0]).is_truthy() {
                    self.statement(children[1]);
                } else if let Some(else_block) = children.get(2) {
                    self.statement(*else_block);
                }
            }
            other => panic!("unexpected statement {other:?}"),
        }
    }

    fn expression(&mut self, id: NodeId) -> Value {
        let ast = self.ast;
        let children = ast.children(id);

        match ast.kind(id) {
            NodeKind::Number(value) => Value::Number(*value),
            NodeKind::Name(name) => self.read(name),

            NodeKind::Call => {
                let callee = self.expression(children[0]);
                let mut argument_sum = 0.0;
                for argument in &children[1..] {
                    argument_sum += self.expression(*argument).number();
                }

                let Value::Function(function) = callee else {
                    panic!("called a number");
                };
                self.calls.push(function);

                let global = self.read("g").number() + f64::from(function) + 1.0;
                self.variables.insert(String::from("g"), Value::Number(global));
                Value::Number(global * 10.0 + argument_sum)
            }

            NodeKind::Binary(BinaryOperator::Add) => {
                let left = self.expression(children[0]).number();
                let right = self.expression(children[1]).number();
                Value::Number(left + right)
            }

            NodeKind::Hook => {
                if self.expression(children[0]).is_truthy() {
                    self.expression(children[1])
                } else {
                    self.expression(children[2])
                }
            }

            NodeKind::And => {
                let left = self.expression(children[0]);
                if left.is_truthy() {
                    self.expression(children[1])
                } else {
                    left
                }
            }

            NodeKind::Or => {
                let left = self.expression(children[0]);
                if left.is_truthy() {
                    left
                } else {
                    self.expression(children[1])
                }
            }

            NodeKind::Assign => {
                let name = ast.name_of(children[0]).expect("assignment to a name");
                let value = self.expression(children[1]);
                self.variables.insert(String::from(name), value);
                value
            }

            NodeKind::AssignOp(BinaryOperator::Add) => {
                let name = ast.name_of(children[0]).expect("assignment to a name");
                let current = self.read(name).number();
                let value = self.expression(children[1]).number();
                let result = Value::Number(current + value);
                self.variables.insert(String::from(name), result);
                result
            }

            other => panic!("unexpected expression {other:?}"),
        }
    }
}

fn calls_in(ast: &Ast) -> Vec<NodeId> {
    ast.preorder(ast.root)
        .into_iter()
        .filter(|node| matches!(ast.kind(*node), NodeKind::Call))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn exposing_a_call_preserves_evaluation_order(
        source in script(),
        target_index in any::<usize>(),
        relocate in any::<bool>(),
    ) {
        let original = parse(&source);
        let calls = calls_in(&original);
        prop_assume!(!calls.is_empty());

        let mut ast = original.clone();
        let target = calls[target_index % calls.len()];

        let mut harness = Harness::new();
        let mut decomposer = harness.decomposer();

        // Statements here are plain expression statements, so every call has a root
        let classification = decomposer.classify(&ast, target).expect("classify");
        prop_assert_ne!(classification, DecompositionType::Undecomposable);

        decomposer.decompose_until_movable(&mut ast, target).expect("decompose");
        prop_assert_eq!(
            decomposer.classify(&ast, target).expect("classify"),
            DecompositionType::Movable
        );

        if relocate {
            decomposer.relocate(&mut ast, target).expect("relocate");
        }

        ast.check_tree_invariants().expect("well formed tree");
        prop_assert_eq!(
            Evaluator::run(&original),
            Evaluator::run(&ast),
            "\n{}\nbecame\n{}",
            source,
            ast.to_source_lines()
        );
    }
}
