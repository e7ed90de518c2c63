//! The C listing the lesson walks through
//!
//! Steps locate themselves in the listing by a snippet of the line they
//! execute, so the listing is the single source of line numbers.

pub const LESSON_SOURCE: &str = r#"/*
 * ptrlab: memory pointers
 *
 * A pointer holds the address of another variable. & takes an address,
 * * follows one. Functions that receive pointers can change the caller's
 * variables, and pointers to locals die with the function that owns them.
 */
#include <stdio.h>
#include <math.h>

#define PI 3.14159265358979323846

typedef struct {
    double x;
    double y;
} Point;

double distance(Point* a, Point* b);
void swap(int* a, int* b);
int* dangling_local(void);
int* global_alias(void);

int global_value = 101;

int main(void)
{
    int* pt1;
    double* pt2;
    int a = 10;
    double b = PI;

    pt1 = &a;
    pt2 = &b;

    printf("a = %d lives at %p\n", a, pt1);
    printf("b = %lf lives at %p\n", b, pt2);

    *pt1 = *pt1 + 2;
    printf("new value of a: %d\n", a);
    printf("read through pt1: %d\n", *pt1);

    int* pt3 = NULL;
    if (pt3 == NULL) {
        printf("pt3 is not initialized\n");
    }

    Point u;
    u.x = 10.4;
    u.y = -23.4;
    Point v;
    v.x = 0;
    v.y = 6.4;
    printf("distance between u and v: %lf\n", distance(&u, &v));

    int x = 42;
    int y = 24;
    printf("before swap: x = %d, y = %d\n", x, y);
    swap(&x, &y);
    printf("after swap: x = %d, y = %d\n", x, y);

    int* dangling = dangling_local();
    printf("dangling = %p (expired)\n", dangling);
    printf("global: %d\n", *global_alias());

    int** pt4 = &pt1;
    printf("a through a double pointer: %d\n", **pt4);

    printf("Enter a number: ");
    scanf("%d", &a);
    printf("you entered %d\n", a);

    // Only run with --fault: reads storage that no longer exists
    printf("dangling points at %d\n", *dangling);

    return 0;
}

double distance(Point* a, Point* b)
{
    return sqrt((a->x - b->x) * (a->x - b->x) + (a->y - b->y) * (a->y - b->y));
}

void swap(int* a, int* b)
{
    int tmp = *a;
    *a = *b;
    *b = tmp;
}

int* dangling_local(void)
{
    int local = 42;
    return &local; // local dies when this function returns
}

int* global_alias(void)
{
    return &global_value; // globals live as long as the program
}
"#;

/// 1-based line number of the first line containing `snippet`
pub fn line_of(snippet: &str) -> Option<usize> {
    LESSON_SOURCE
        .lines()
        .position(|line| line.contains(snippet))
        .map(|index| index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of() {
        assert_eq!(line_of("/*"), Some(1));
        assert!(line_of("int main(void)").is_some());
        assert!(line_of("no such line").is_none());
    }

    #[test]
    fn test_main_precedes_helpers() {
        let main = line_of("int main(void)").unwrap();
        let helper = line_of("int local = 42;").unwrap();
        assert!(helper > main);
    }
}
