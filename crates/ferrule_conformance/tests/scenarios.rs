//! End-to-end folding of the expressions lint rules hand to the engine.

use ferrule_conformance::{bin, cast, int, lit, un, Session};
use ferrule_eval::{remove_redundant_casts, FoldError};
use ferrule_ir::{BinaryOp, PrimitiveType, Type, UnaryOp, Value};

#[test]
fn constant_arithmetic_folds_to_a_literal() {
    let session = Session::new();
    let e = bin(BinaryOp::Mul, bin(BinaryOp::Plus, int(2), int(3)), int(4));
    let folded = session.fold(&e).unwrap();
    assert_eq!(folded.as_literal(), Some(&Value::Int(20)));
    assert_eq!(session.show(&folded), "20");
}

#[test]
fn integer_division_by_zero_is_unevaluable() {
    let session = Session::new();
    let e = bin(BinaryOp::Div, int(1), int(0));
    let err = session.fold(&e).unwrap_err();
    assert!(matches!(err, FoldError::Unevaluable { .. }));
    assert_eq!(
        err.to_string(),
        "constant expression `1 / 0` cannot be evaluated: division by zero"
    );
    assert_eq!(session.fold_to_string(&e), "1 / 0");
}

#[test]
fn true_and_call_keeps_the_call() {
    let session = Session::new();
    let e = bin(BinaryOp::And, lit(Value::Bool(true)), session.call("isReady", Type::BOOLEAN));
    assert_eq!(session.fold_to_string(&e), "isReady()");
}

#[test]
fn final_field_is_inlined_into_comparison() {
    let mut session = Session::new();
    let x = session.param("x", Type::INT);
    let limit = session.constant("LIMIT", Type::INT, int(10));
    let e = bin(BinaryOp::Lt, x, limit);
    assert_eq!(session.fold_to_string(&e), "x < 10");
}

#[test]
fn redundant_intermediate_cast_is_dropped() {
    let mut session = Session::new();
    let b = session.param("someByteExpr", Type::BYTE);
    let widened = cast(b.clone(), &[Type::INT, Type::LONG]);
    let cleaned = remove_redundant_casts(widened);
    assert_eq!(session.show(&cleaned), "(long) someByteExpr");
    assert_eq!(cleaned.expression_type(), Some(&Type::LONG));

    let boxed = cast(b, &[Type::INT, Type::Boxed(PrimitiveType::Int)]);
    let kept = remove_redundant_casts(boxed);
    assert_eq!(session.show(&kept), "(Integer) (int) someByteExpr");
}

#[test]
fn double_negation_cancels() {
    let mut session = Session::new();
    let x = session.param("x", Type::INT);
    let e = un(UnaryOp::Neg, un(UnaryOp::Neg, x));
    assert_eq!(session.fold_to_string(&e), "x");

    let s = session.param("s", Type::SHORT);
    let e = un(UnaryOp::Neg, un(UnaryOp::Neg, s));
    assert_eq!(session.fold_to_string(&e), "(int) s");
}

#[test]
fn mixed_constant_and_variable_expression() {
    let mut session = Session::new();
    let n = session.local("n", Type::LONG, int(3));
    let y = session.param("y", Type::LONG);
    // (n * 2 + 0) * y  with n = 3
    let e = bin(
        BinaryOp::Mul,
        bin(BinaryOp::Plus, bin(BinaryOp::Mul, n, int(2)), int(0)),
        y,
    );
    assert_eq!(session.fold_to_string(&e), "6L * y");
}

#[test]
fn string_concatenation_of_constants() {
    let mut session = Session::new();
    let name = session.constant("NAME", Type::String, lit(Value::String("max".into())));
    let e = bin(
        BinaryOp::Plus,
        bin(BinaryOp::Plus, name, lit(Value::Char(u16::from(b'=')))),
        bin(BinaryOp::Div, lit(Value::Double(1.0)), int(4)),
    );
    assert_eq!(session.fold_to_string(&e), "\"max=0.25\"");
}

#[test]
fn casts_on_constant_operands() {
    let session = Session::new();
    let e = bin(BinaryOp::Plus, cast(lit(Value::Char(97)), &[Type::FLOAT]), int(1));
    assert_eq!(session.fold_to_string(&e), "98.0F");
    let e = bin(BinaryOp::Plus, cast(int(400), &[Type::BYTE]), int(20));
    assert_eq!(session.fold_to_string(&e), "-92");
}

#[test]
fn identity_laws_keep_operands_that_may_throw() {
    let mut session = Session::new();
    let a = session.param("a", Type::INT);
    let b = session.param("b", Type::INT);
    let quotient = bin(BinaryOp::Mul, bin(BinaryOp::Div, a.clone(), b), int(0));
    assert_eq!(session.fold_to_string(&quotient), "a / b * 0");
    let remainder = bin(BinaryOp::Mul, bin(BinaryOp::Mod, a.clone(), int(4)), int(0));
    assert_eq!(session.fold_to_string(&remainder), "0");

    let n = session.param("n", Type::Boxed(PrimitiveType::Int));
    assert_eq!(session.fold_to_string(&bin(BinaryOp::Mul, n, int(0))), "n * 0");
    assert_eq!(session.fold_to_string(&bin(BinaryOp::Mul, a, int(0))), "0");

    let flag = session.param("flag", Type::Boxed(PrimitiveType::Boolean));
    let and = bin(BinaryOp::And, flag.clone(), lit(Value::Bool(false)));
    assert_eq!(session.fold_to_string(&and), "flag && false");
    let or = bin(BinaryOp::Or, flag, lit(Value::Bool(true)));
    assert_eq!(session.fold_to_string(&or), "flag || true");
}
