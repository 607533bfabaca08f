//! Cast manipulation shared by the folds.
//!
//! Casts on an [`Expr`] are stored innermost first. Every function here
//! preserves the expression type (the type after all casts) unless it is
//! explicitly asked to add a cast.

use crate::numeric::cast_value;
use ferrule_ir::{Expr, ExprKind, PrimitiveType, Type, TypeCast};

/// Position of a primitive in the widening order `byte < short < int < long < float < double`.
fn widening_rank(p: PrimitiveType) -> Option<u8> {
    match p {
        PrimitiveType::Byte => Some(0),
        PrimitiveType::Short => Some(1),
        PrimitiveType::Int => Some(2),
        PrimitiveType::Long => Some(3),
        PrimitiveType::Float => Some(4),
        PrimitiveType::Double => Some(5),
        PrimitiveType::Boolean | PrimitiveType::Char => None,
    }
}

/// Returns `true` if a value of type `from` is converted to `to` without an explicit cast
/// (identity, boxing, unboxing, widening primitive, or widening reference conversion).
pub fn is_implicitly_castable(from: &Type, to: &Type) -> bool {
    if from == to || from.unbox() == to.unbox() {
        return true;
    }
    if let (Some(pf), Some(pt)) = (from.unboxed_primitive(), to.as_primitive()) {
        if pf == PrimitiveType::Char {
            return matches!(
                pt,
                PrimitiveType::Int
                    | PrimitiveType::Long
                    | PrimitiveType::Float
                    | PrimitiveType::Double
            );
        }
        return match (widening_rank(pf), widening_rank(pt)) {
            (Some(f), Some(t)) => f <= t,
            _ => false,
        };
    }
    if to.is_primitive() {
        return false;
    }
    from.is_subtype_of(to) || from.boxed().is_subtype_of(to)
}

/// Returns `true` if converting `from` to `to` is an implicit conversion that
/// never changes the value, so that a later conversion gives the same result
/// whether or not this one happens first.
pub fn is_lossless(from: &Type, to: &Type) -> bool {
    if from == to {
        return true;
    }
    let (Some(pf), Some(pt)) = (from.unboxed_primitive(), to.unboxed_primitive()) else {
        return false;
    };
    if pf == pt {
        return true;
    }
    if !is_implicitly_castable(from, to) || !to.is_primitive() {
        return false;
    }
    match pt {
        PrimitiveType::Short | PrimitiveType::Int | PrimitiveType::Long => pf.is_integral(),
        PrimitiveType::Float => matches!(
            pf,
            PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char
        ),
        PrimitiveType::Double => pf != PrimitiveType::Long,
        _ => false,
    }
}

/// Returns `true` if `current -> first -> second` equals `current -> second`
/// for every value, where `first` narrows `current`.
fn narrowings_merge(current: &Type, first: &Type, second: &Type) -> bool {
    let (Some(c), Some(n), Some(m)) = (
        current.as_primitive(),
        first.as_primitive(),
        second.as_primitive(),
    ) else {
        return false;
    };
    if !c.is_numeric() || !n.is_integral() || !m.is_integral() {
        return false;
    }
    let (Some(n_bits), Some(m_bits)) = (n.bit_width(), m.bit_width()) else {
        return false;
    };
    // floating values reach byte/short/char through int, but long saturates differently
    m_bits <= n_bits && (c.is_integral() || n_bits <= 32)
}

fn remove_once(expr: &mut Expr) -> bool {
    let (Some(base), Some(original)) = (expr.ty.clone(), expr.expression_type().cloned()) else {
        return false;
    };
    let casts = std::mem::take(&mut expr.casts);
    let mut current = base;
    let mut kept: Vec<TypeCast> = Vec::with_capacity(casts.len());

    for (i, cast) in casts.iter().enumerate() {
        let target = &cast.target;
        let next = casts.get(i + 1).map(|c| &c.target);

        // boxing is only reachable from the exact primitive
        if let Some(next) = next {
            if next.is_boxed() && current != next.unbox() {
                kept.push(cast.clone());
                current = target.clone();
                continue;
            }
        }

        if is_implicitly_castable(&current, target) {
            if next.is_none() || is_lossless(&current, target) {
                continue;
            }
        } else if let Some(next) = next {
            if narrowings_merge(&current, target, next) {
                continue;
            }
        }

        kept.push(cast.clone());
        current = target.clone();
    }

    if current != original {
        kept.push(TypeCast::implicit(original));
    }
    let changed = kept != casts;
    expr.casts = kept;
    changed
}

/// Drops casts the language would perform implicitly, and merges chained
/// narrowing casts when the merged cast is value-identical.
///
/// If dropping changes the expression type, a type-preserving
/// [`TypeCast::implicit`] marker is appended. Never increases the number of
/// casts, and running it on its own output changes nothing.
pub fn remove_redundant_casts(mut expr: Expr) -> Expr {
    let bound = expr.casts.len() + 2;
    for _ in 0..bound {
        if !remove_once(&mut expr) {
            break;
        }
    }
    expr
}

/// Casts `expr` to `ty` unless it already has that type, then removes redundant casts.
pub fn cast_expression(ty: &Type, mut expr: Expr) -> Expr {
    if expr.expression_type() == Some(ty) {
        return expr;
    }
    expr.casts.push(TypeCast::explicit(ty.clone()));
    remove_redundant_casts(expr)
}

/// Converts a literal's value to `ty` and types it accordingly.
///
/// Returns the literal unchanged (with the cast appended) if the conversion
/// is not defined on constants.
pub fn cast_literal(ty: &Type, literal: Expr) -> Expr {
    let converted = match &literal.kind {
        ExprKind::Literal(value) if literal.casts.is_empty() => cast_value(value, ty),
        _ => None,
    };
    match converted {
        Some(value) => Expr {
            kind: ExprKind::Literal(value),
            ty: Some(ty.clone()),
            casts: Vec::new(),
        },
        None => literal.with_cast(ty.clone()),
    }
}

/// Folds all pending casts of a literal into its value, innermost first.
///
/// Stops at the first cast that cannot be applied to a constant and leaves
/// it and all outer casts in place.
pub fn apply_casts(mut literal: Expr) -> Expr {
    if !literal.is_literal() {
        return literal;
    }
    let casts = std::mem::take(&mut literal.casts);
    let mut pending = casts.into_iter();
    for cast in pending.by_ref() {
        let converted = match &literal.kind {
            ExprKind::Literal(value) => cast_value(value, &cast.target),
            _ => None,
        };
        match converted {
            Some(value) => {
                literal.kind = ExprKind::Literal(value);
                literal.ty = Some(cast.target);
            }
            None => {
                literal.casts.push(cast);
                break;
            }
        }
    }
    literal.casts.extend(pending);
    literal
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrule_common::Interner;
    use ferrule_ir::{Value, VarId};

    const BOXED_INT: Type = Type::Boxed(PrimitiveType::Int);
    const BOXED_CHAR: Type = Type::Boxed(PrimitiveType::Char);
    const BOXED_BYTE: Type = Type::Boxed(PrimitiveType::Byte);

    fn var(interner: &Interner, name: &str, ty: Type) -> Expr {
        Expr::var_read(VarId::from_raw(0), interner.get_or_intern(name), ty)
    }

    fn cast_all(mut expr: Expr, outer_to_inner: &[Type]) -> Expr {
        for ty in outer_to_inner.iter().rev() {
            expr = expr.with_cast(ty.clone());
        }
        expr
    }

    /// Builds `(T1) (T2) ... name`, removes redundant casts, and prints the result.
    fn simplify(declared: Type, outer_to_inner: &[Type]) -> String {
        let interner = Interner::new();
        let expr = cast_all(var(&interner, "x", declared), outer_to_inner);
        let before = expr.expression_type().cloned();
        let after = remove_redundant_casts(expr);
        assert_eq!(after.expression_type().cloned(), before, "type changed");
        after.display(&interner).to_string()
    }

    #[test]
    fn implicit_conversions() {
        assert!(is_implicitly_castable(&Type::BYTE, &Type::DOUBLE));
        assert!(is_implicitly_castable(&Type::CHAR, &Type::INT));
        assert!(!is_implicitly_castable(&Type::CHAR, &Type::SHORT));
        assert!(!is_implicitly_castable(&Type::BYTE, &Type::CHAR));
        assert!(!is_implicitly_castable(&Type::LONG, &Type::INT));
        assert!(is_implicitly_castable(&BOXED_CHAR, &Type::CHAR));
        assert!(is_implicitly_castable(&BOXED_BYTE, &Type::INT));
        assert!(is_implicitly_castable(&Type::String, &Type::Object));
        assert!(!is_implicitly_castable(&Type::Object, &Type::String));
        assert!(is_implicitly_castable(&Type::INT, &Type::Object));
    }

    #[test]
    fn lossless_conversions() {
        assert!(is_lossless(&Type::INT, &Type::LONG));
        assert!(is_lossless(&Type::INT, &Type::DOUBLE));
        assert!(!is_lossless(&Type::INT, &Type::FLOAT));
        assert!(!is_lossless(&Type::LONG, &Type::DOUBLE));
        assert!(is_lossless(&Type::CHAR, &Type::FLOAT));
        assert!(is_lossless(&Type::FLOAT, &Type::DOUBLE));
        assert!(is_lossless(&BOXED_INT, &Type::INT));
        assert!(!is_lossless(&Type::String, &Type::Object));
    }

    #[test]
    fn drops_identity_cast() {
        assert_eq!(simplify(Type::BYTE, &[Type::BYTE]), "x");
    }

    #[test]
    fn boxing_cast_becomes_marker() {
        assert_eq!(simplify(Type::BYTE, &[BOXED_BYTE]), "(Byte) x");
    }

    #[test]
    fn widening_then_narrowing_back_collapses() {
        assert_eq!(simplify(Type::CHAR, &[Type::CHAR, Type::INT]), "x");
    }

    #[test]
    fn drops_lossless_intermediate() {
        assert_eq!(simplify(Type::BYTE, &[Type::CHAR, Type::LONG]), "(char) x");
        assert_eq!(simplify(Type::BYTE, &[Type::LONG, Type::INT]), "(long) x");
    }

    #[test]
    fn keeps_lossy_intermediate() {
        assert_eq!(simplify(Type::FLOAT, &[Type::INT, Type::LONG]), "(int) (long) x");
        assert_eq!(simplify(Type::INT, &[Type::DOUBLE, Type::FLOAT]), "(double) (float) x");
    }

    #[test]
    fn trailing_widening_is_kept_as_marker() {
        assert_eq!(simplify(Type::CHAR, &[Type::INT, Type::CHAR]), "(int) x");
        let interner = Interner::new();
        let e = remove_redundant_casts(var(&interner, "c", Type::CHAR).with_cast(Type::INT));
        assert_eq!(e.casts, vec![TypeCast::implicit(Type::INT)]);
    }

    #[test]
    fn boxing_needs_exact_primitive() {
        assert_eq!(simplify(Type::SHORT, &[BOXED_INT, Type::INT]), "(Integer) (int) x");
        assert_eq!(simplify(Type::INT, &[Type::INT, Type::SHORT]), "(int) (short) x");
        assert_eq!(simplify(BOXED_CHAR, &[BOXED_INT, Type::INT, Type::CHAR]), "(Integer) (int) x");
        assert_eq!(simplify(BOXED_CHAR, &[BOXED_INT, Type::INT]), "(Integer) (int) x");
        assert_eq!(simplify(Type::CHAR, &[BOXED_INT, Type::INT, BOXED_CHAR]), "(Integer) (int) x");
    }

    #[test]
    fn merges_integral_narrowings() {
        assert_eq!(simplify(Type::LONG, &[Type::SHORT, Type::INT]), "(short) x");
        assert_eq!(simplify(Type::DOUBLE, &[Type::BYTE, Type::INT]), "(byte) x");
        // long -> int -> long truncates; it is not a no-op
        assert_eq!(simplify(Type::LONG, &[Type::LONG, Type::INT]), "(long) (int) x");
        // short -> byte -> char sign-extends from bit 7
        assert_eq!(simplify(Type::SHORT, &[Type::CHAR, Type::BYTE]), "(char) (byte) x");
    }

    #[test]
    fn reference_widening_is_dropped() {
        let interner = Interner::new();
        let e = remove_redundant_casts(var(&interner, "s", Type::String).with_cast(Type::Object));
        assert_eq!(e.casts, vec![TypeCast::implicit(Type::Object)]);
        assert_eq!(e.display(&interner).to_string(), "(Object) s");
    }

    #[test]
    fn idempotent_and_never_grows() {
        let chains: &[&[Type]] = &[
            &[Type::SHORT, Type::LONG, Type::INT],
            &[BOXED_INT, Type::INT, Type::CHAR],
            &[Type::DOUBLE, Type::FLOAT, Type::LONG],
            &[Type::Object],
        ];
        let interner = Interner::new();
        for chain in chains {
            let expr = cast_all(var(&interner, "x", Type::DOUBLE), chain);
            let once = remove_redundant_casts(expr.clone());
            assert!(once.casts.len() <= expr.casts.len());
            assert_eq!(remove_redundant_casts(once.clone()), once);
        }
    }

    #[test]
    fn cast_expression_skips_same_type() {
        let interner = Interner::new();
        let x = var(&interner, "x", Type::INT);
        assert_eq!(cast_expression(&Type::INT, x.clone()), x);
        let widened = cast_expression(&Type::LONG, x);
        assert_eq!(widened.expression_type(), Some(&Type::LONG));
        assert_eq!(widened.display(&interner).to_string(), "(long) x");
    }

    #[test]
    fn apply_casts_innermost_first() {
        let lit = Expr::literal(Value::Int(400))
            .with_cast(Type::BYTE)
            .with_cast(Type::INT);
        let folded = apply_casts(lit);
        assert_eq!(folded.as_literal(), Some(&Value::Int(-112)));
        assert_eq!(folded.ty, Some(Type::INT));
        assert!(folded.casts.is_empty());
    }

    #[test]
    fn apply_casts_stops_at_impossible_cast() {
        let lit = Expr::literal(Value::Bool(true))
            .with_cast(Type::INT)
            .with_cast(Type::LONG);
        let folded = apply_casts(lit);
        assert_eq!(folded.as_literal(), Some(&Value::Bool(true)));
        assert_eq!(folded.casts.len(), 2);
    }

    #[test]
    fn cast_literal_converts_value() {
        let lit = cast_literal(&Type::FLOAT, Expr::literal(Value::Char(97)));
        assert_eq!(lit.as_literal(), Some(&Value::Float(97.0)));
        assert_eq!(lit.ty, Some(Type::FLOAT));
        let null = cast_literal(&Type::String, Expr::literal(Value::Null));
        assert_eq!(null.ty, Some(Type::String));
    }
}
