//! Declaration surgery shared by the operations.

use javelin_model::Field;
use javelin_parse::{SourceFile, TokenRange};

use crate::edit::Rewriter;

/// Remove `field`'s declarator from its declaration statement.
///
/// The sole declarator takes the whole statement with it. In a shared
/// statement the declarator leaves together with the separator binding it to
/// its neighbor (the comma after it when it is first, the comma before it
/// otherwise), so the remaining list stays syntactically valid.
pub(crate) fn remove_field_declarator(rewriter: &mut Rewriter, sf: &SourceFile, field: &Field) {
    if field.is_sole_declarator() {
        rewriter.delete(&sf.file, field.statement_tokens);
        return;
    }

    let i = field.declarator_index;
    let decls = &field.all_declarators;
    if i == 0 {
        // Rewrite `a, b` to `b` so no stray separator or padding survives.
        let next = decls[1];
        rewriter.replace(
            &sf.file,
            TokenRange::new(decls[0].start, next.end),
            sf.token_text(next).to_string(),
        );
    } else {
        rewriter.delete(&sf.file, TokenRange::new(decls[i - 1].end, decls[i].end));
    }
}

/// The visibility a redeclaration in a different class may keep: only
/// `public` and `protected` survive, since the field must stay visible from
/// outside its original class.
pub(crate) fn inherited_visibility(field: &Field) -> &'static str {
    if field.has_modifier("public") {
        "public "
    } else if field.has_modifier("protected") {
        "protected "
    } else {
        ""
    }
}
