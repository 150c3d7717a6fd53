/// Stack machine that resolves tag nesting
use crate::ast::{Child, Element};
use crate::lexer::Token;
use crate::tags::{TagSet, fold_name};
use std::collections::HashMap;

/// Consume the token sequence and build the document tree. Total over every
/// input: malformed nesting is repaired by breaking tags back into literal
/// text, never by dropping anything or failing.
pub fn build(tokens: Vec<Token>, tags: &TagSet) -> Element {
    // Per-name count of tags currently open on the stack, so a closing tag
    // can tell in O(1) whether an in-scope opener exists.
    let mut open: HashMap<String, usize> = HashMap::new();
    for token in &tokens {
        if let Token::Tag(tag) = token {
            open.insert(fold_name(&tag.name), 0);
        }
    }

    let mut stack = vec![Element::root()];
    for token in tokens {
        let raw_mode = tags.get(&top(&stack).key).is_some_and(|def| def.no_code);
        match token {
            Token::Text(text) => top_mut(&mut stack).children.push(Child::Text(text)),
            Token::Tag(tag) => {
                let key = fold_name(&tag.name);
                if raw_mode {
                    // Inside a no-code tag everything is literal until its
                    // own closing tag turns up.
                    if tag.closing && key == top(&stack).key {
                        close_top(&mut stack, &mut open, tag.raw);
                    } else {
                        top_mut(&mut stack).children.push(Child::Text(tag.raw));
                    }
                } else if !tag.closing {
                    let self_closing = tags.get(&key).is_some_and(|def| def.self_closing);
                    let element = Element::open(tag, key.clone());
                    if self_closing {
                        // Renders on open; it never takes a body.
                        top_mut(&mut stack).children.push(Child::Element(element));
                    } else {
                        *open.entry(key).or_insert(0) += 1;
                        stack.push(element);
                    }
                } else if open.get(&key).copied().unwrap_or(0) > 0 {
                    // Break every dangling tag inside the one that closes.
                    while top(&stack).key != key {
                        break_top(&mut stack, &mut open);
                    }
                    close_top(&mut stack, &mut open, tag.raw);
                } else {
                    // No opener in scope; the closing tag passes through.
                    top_mut(&mut stack).children.push(Child::Text(tag.raw));
                }
            }
        }
    }

    // Break the dangling open tags, innermost first.
    while stack.len() > 1 {
        break_top(&mut stack, &mut open);
    }
    pop(&mut stack)
}

fn top(stack: &[Element]) -> &Element {
    stack.last().expect("stack holds at least the root")
}

fn top_mut(stack: &mut Vec<Element>) -> &mut Element {
    stack.last_mut().expect("stack holds at least the root")
}

fn pop(stack: &mut Vec<Element>) -> Element {
    stack.pop().expect("stack holds at least the root")
}

/// Finalize the top element: it closed with correct nesting and becomes a
/// single renderable child of its parent.
fn close_top(stack: &mut Vec<Element>, open: &mut HashMap<String, usize>, raw_close: String) {
    let mut closed = pop(stack);
    closed.raw_close = Some(raw_close);
    if let Some(count) = open.get_mut(&closed.key) {
        *count -= 1;
    }
    top_mut(stack).children.push(Child::Element(closed));
}

/// Demote the top element back to literal text: its original open-tag text
/// and its children are spliced into the parent, and the element itself is
/// discarded. It will never render.
fn break_top(stack: &mut Vec<Element>, open: &mut HashMap<String, usize>) {
    let broken = pop(stack);
    if let Some(count) = open.get_mut(&broken.key) {
        *count -= 1;
    }
    let parent = top_mut(stack);
    parent.children.push(Child::Text(broken.raw_open));
    parent.children.extend(broken.children);
}
