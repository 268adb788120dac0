#![feature(test)]
extern crate test;
use test::Bencher;

use conics::{ConicSection, RatQuad};
use kurbo::{Point, Rect};

fn ellipse() -> ConicSection {
    ConicSection::new(0.25, 0.3, 1.0, -0.5, 0.2, -1.0)
}

#[bench]
fn bench_kind(b: &mut Bencher) {
    let conic = ellipse();
    b.iter(|| test::black_box(conic).kind());
}

#[bench]
fn bench_clip(b: &mut Bencher) {
    let conic = ellipse();
    let rect = Rect::new(0.0, -3.0, 3.0, 3.0);
    let mut arcs: Vec<RatQuad> = Vec::with_capacity(8);
    b.iter(|| {
        arcs.clear();
        conic.clip(test::black_box(rect), &mut arcs)
    });
}

#[bench]
fn bench_intersect(b: &mut Bencher) {
    let a = ellipse();
    let c = ConicSection::circle(Point::new(0.5, 0.0), 1.5);
    b.iter(|| test::black_box(a).intersect(&c));
}

#[bench]
fn bench_nearest_point(b: &mut Bencher) {
    let conic = ellipse();
    b.iter(|| test::black_box(conic).nearest_point(Point::new(3.0, 1.0)));
}

#[bench]
fn bench_fit(b: &mut Bencher) {
    let points = [
        Point::new(2.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(-2.0, 0.0),
        Point::new(0.0, -1.0),
        Point::new(1.2, 0.8),
        Point::new(-1.2, -0.8),
    ];
    b.iter(|| ConicSection::fit(test::black_box(&points)));
}
